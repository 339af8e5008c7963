use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Date, Math};

use super::abi;
use super::constants::RPC_ENDPOINTS;
use once_cell::sync::Lazy;

// error type
#[derive(Debug, Clone)]
pub enum RpcError {
    ConnectionFailed(String),
    EthRpcError(String),
    InvalidResponse(String),
    Other(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RpcError::EthRpcError(msg) => write!(f, "Ethereum RPC error: {}", msg),
            RpcError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            RpcError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Read-path JSON-RPC connection to a public node.
///
/// Only ever used for reads (`eth_call`, balances); writes go through the
/// wallet provider, which signs and broadcasts itself.
#[derive(Clone)]
pub struct RpcConnection {
    endpoint: String,
}

#[derive(Serialize)]
struct RpcRequest<T> {
    jsonrpc: String,
    id: u64,
    method: String,
    params: T,
}

static ERROR_STRING_SELECTOR: Lazy<[u8; 4]> = Lazy::new(|| abi::selector("Error(string)"));

impl RpcConnection {
    pub fn new() -> Self {
        let endpoint = Self::select_endpoint();
        log::debug!("Selected RPC endpoint: {}", endpoint);
        Self::with_endpoint(&endpoint)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    /// Pick one of the configured public endpoints at random so a single
    /// flaky node does not pin every session.
    fn select_endpoint() -> String {
        if RPC_ENDPOINTS.len() == 1 {
            return RPC_ENDPOINTS[0].to_string();
        }
        let index = match Self::try_crypto_random() {
            Some(value) => (value as usize) % RPC_ENDPOINTS.len(),
            None => {
                let value = Math::random() * RPC_ENDPOINTS.len() as f64;
                (value as usize).min(RPC_ENDPOINTS.len() - 1)
            }
        };
        RPC_ENDPOINTS[index].to_string()
    }

    /// Unique request id: crypto random when available, timestamp fallback.
    fn generate_request_id() -> u64 {
        Self::try_crypto_random().unwrap_or_else(|| {
            let timestamp = Date::now() as u64 % 10_000_000_000;
            timestamp * 10_000 + (Math::random() * 10_000.0) as u64
        })
    }

    fn try_crypto_random() -> Option<u64> {
        let crypto = web_sys::window()?.crypto().ok()?;
        let mut buffer = [0u8; 8];
        crypto.get_random_values_with_u8_array(&mut buffer).ok()?;
        // clear the sign bit so the id stays a sane positive number
        Some(u64::from_be_bytes(buffer) & 0x7FFF_FFFF_FFFF_FFFF)
    }

    pub async fn send_request<T, R>(&self, method: &str, params: T) -> Result<R, RpcError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Self::generate_request_id(),
            method: method.to_string(),
            params,
        };

        let request_body = serde_json::to_string(&request).map_err(|e| {
            log::error!("Failed to serialize request: {}", e);
            RpcError::Other(e.to_string())
        })?;
        log::debug!("RPC request body: {}", request_body);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&request_body));

        let request = Request::new_with_str_and_init(&self.endpoint, &opts).map_err(|e| {
            log::error!("Failed to create HTTP request: {:?}", e);
            RpcError::ConnectionFailed(format!("Failed to create request: {:?}", e))
        })?;

        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| RpcError::ConnectionFailed(format!("Failed to set headers: {:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| RpcError::Other("No window object".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                log::error!("HTTP request failed: {:?}", e);
                RpcError::ConnectionFailed(format!("Failed to send request: {:?}", e))
            })?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to convert response: {:?}", e)))?;

        if !resp.ok() {
            log::error!("HTTP error: status={} {}", resp.status(), resp.status_text());
            return Err(RpcError::ConnectionFailed(format!(
                "HTTP {} {}",
                resp.status(),
                resp.status_text()
            )));
        }

        let json = JsFuture::from(
            resp.json()
                .map_err(|e| RpcError::InvalidResponse(format!("Failed to get JSON: {:?}", e)))?,
        )
        .await
        .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse JSON: {:?}", e)))?;

        let value: serde_json::Value = json
            .into_serde()
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse response: {:?}", e)))?;

        if let Some(error) = value.get("error") {
            log::error!("RPC error for {}: {}", method, error);
            return Err(RpcError::EthRpcError(Self::describe_error(error)));
        }

        match value.get("result") {
            Some(result) => {
                log::debug!("RPC request {} completed successfully", method);
                serde_json::from_value(result.clone()).map_err(|e| {
                    log::error!("Failed to deserialize result for {}: {:?}", method, e);
                    RpcError::InvalidResponse(format!("Failed to deserialize result: {:?}", e))
                })
            }
            None => {
                log::error!("RPC response missing result field for method {}", method);
                Err(RpcError::InvalidResponse(
                    "Response missing result field".to_string(),
                ))
            }
        }
    }

    /// Build a readable message from a JSON-RPC error object, decoding the
    /// revert reason out of `Error(string)` payloads when one is attached.
    fn describe_error(error: &serde_json::Value) -> String {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");

        let revert = error
            .get("data")
            .and_then(|d| d.as_str())
            .and_then(Self::decode_revert_reason);

        match revert {
            Some(reason) => format!("Code {}: {} - {}", code, message, reason),
            None => format!("Code {}: {}", code, message),
        }
    }

    fn decode_revert_reason(data_hex: &str) -> Option<String> {
        let data = abi::decode_hex(data_hex).ok()?;
        if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR[..] {
            return None;
        }
        let dec = abi::Decoder::new(&data[4..]);
        let offset = dec.offset_at(0, 0).ok()?;
        dec.string_at(offset).ok()
    }

    /// `eth_call` against a contract; returns the raw return payload.
    pub async fn eth_call(&self, to: &str, calldata: &[u8]) -> Result<Vec<u8>, RpcError> {
        let params = serde_json::json!([
            {
                "to": to,
                "data": abi::encode_hex(calldata),
            },
            "latest"
        ]);
        let result: String = self.send_request("eth_call", params).await?;
        abi::decode_hex(&result).map_err(|e| RpcError::InvalidResponse(e.to_string()))
    }

    /// Account balance in wei.
    pub async fn get_balance(&self, address: &str) -> Result<u128, RpcError> {
        let params = serde_json::json!([address, "latest"]);
        let result: String = self.send_request("eth_getBalance", params).await?;
        parse_quantity(&result)
    }

}

impl Default for RpcConnection {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a JSON-RPC hex quantity ("0x1a") into an integer.
pub fn parse_quantity(s: &str) -> Result<u128, RpcError> {
    let h = s.strip_prefix("0x").unwrap_or(s);
    if h.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(h, 16)
        .map_err(|e| RpcError::InvalidResponse(format!("Bad hex quantity '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1a").unwrap(), 26);
        assert_eq!(parse_quantity("0x").unwrap(), 0);
        assert_eq!(
            parse_quantity("0xde0b6b3a7640000").unwrap(),
            1_000_000_000_000_000_000
        );
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn decodes_error_string_reverts() {
        // Error(string) payload carrying "Deadline passed"
        let reason = "Deadline passed";
        let mut payload = ERROR_STRING_SELECTOR.to_vec();
        let body = abi::encode_call([0u8; 4], &[abi::Token::Str(reason.to_string())]);
        payload.extend_from_slice(&body[4..]);

        let decoded = RpcConnection::decode_revert_reason(&abi::encode_hex(&payload));
        assert_eq!(decoded.as_deref(), Some(reason));

        // unrelated payloads are left alone
        assert_eq!(RpcConnection::decode_revert_reason("0x1234abcd"), None);
    }
}
