use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use super::constants::CHAIN_ID_HEX;

#[derive(Debug, Clone)]
pub enum WalletError {
    NotInstalled,
    ConnectionFailed(String),
    WrongNetwork(String),
    TransactionRejected(String),
    JavaScriptError(String),
}

impl std::fmt::Display for WalletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletError::NotInstalled => write!(f, "No wallet extension installed"),
            WalletError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            WalletError::WrongNetwork(msg) => write!(f, "Wrong network: {}", msg),
            WalletError::TransactionRejected(msg) => write!(f, "Transaction rejected: {}", msg),
            WalletError::JavaScriptError(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}

/// A transaction handed to the wallet for signing and broadcast.
///
/// Quantities are 0x-prefixed hex strings, the shape `eth_sendTransaction`
/// expects on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct TxRequest {
    pub from: String,
    pub to: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// MetaMask wallet integration module.
///
/// Drives the injected `window.ethereum` provider. The extension owns all
/// key material; this module only shuttles requests across the JS boundary.
pub struct MetamaskWallet;

impl MetamaskWallet {
    fn provider() -> Result<JsValue, WalletError> {
        let window = window()
            .ok_or_else(|| WalletError::JavaScriptError("No window object".to_string()))?;
        let provider = Reflect::get(&window, &JsValue::from_str("ethereum"))
            .map_err(|e| WalletError::JavaScriptError(format!("Failed to get provider: {:?}", e)))?;
        if provider.is_undefined() || provider.is_null() {
            return Err(WalletError::NotInstalled);
        }
        Ok(provider)
    }

    /// Check if an injected provider is present in the browser.
    pub fn is_installed() -> bool {
        Self::provider().is_ok()
    }

    /// Call `provider.request({ method, params })` and await the promise.
    ///
    /// A rejected promise (user dismissed the popup, provider error) comes
    /// back as `ConnectionFailed`; callers re-wrap it per operation.
    async fn request(method: &str, params: serde_json::Value) -> Result<JsValue, WalletError> {
        let provider = Self::provider()?;

        let request_fn = Reflect::get(&provider, &JsValue::from_str("request"))
            .map_err(|e| WalletError::JavaScriptError(format!("Failed to get request: {:?}", e)))?;
        if !request_fn.is_function() {
            return Err(WalletError::JavaScriptError(
                "request is not a function".to_string(),
            ));
        }

        let args = JsValue::from_serde(&serde_json::json!({
            "method": method,
            "params": params,
        }))
        .map_err(|e| WalletError::JavaScriptError(format!("Failed to build args: {}", e)))?;

        let func = Function::from(request_fn);
        let promise = func
            .call1(&provider, &args)
            .map_err(|e| WalletError::JavaScriptError(format!("{:?}", e)))?;

        JsFuture::from(Promise::from(promise))
            .await
            .map_err(|e| WalletError::ConnectionFailed(js_error_message(&e)))
    }

    /// Request account access and return the selected address.
    pub async fn connect() -> Result<String, WalletError> {
        let result = Self::request("eth_requestAccounts", serde_json::json!([])).await?;
        let accounts: Vec<String> = result
            .into_serde()
            .map_err(|e| WalletError::ConnectionFailed(format!("Bad accounts list: {}", e)))?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::ConnectionFailed("No account selected".to_string()))
    }

    /// Accounts already authorized for this origin, without prompting.
    pub async fn accounts() -> Result<Vec<String>, WalletError> {
        let result = Self::request("eth_accounts", serde_json::json!([])).await?;
        result
            .into_serde()
            .map_err(|e| WalletError::ConnectionFailed(format!("Bad accounts list: {}", e)))
    }

    /// The chain the wallet is currently on, as a 0x hex id.
    pub async fn chain_id() -> Result<String, WalletError> {
        let result = Self::request("eth_chainId", serde_json::json!([])).await?;
        result
            .as_string()
            .ok_or_else(|| WalletError::JavaScriptError("Chain id is not a string".to_string()))
    }

    /// Make sure the wallet is on the chain the contract is deployed to,
    /// asking it to switch when it is not.
    pub async fn ensure_chain() -> Result<(), WalletError> {
        let current = Self::chain_id().await?;
        if current.eq_ignore_ascii_case(CHAIN_ID_HEX) {
            return Ok(());
        }

        log::info!("Wallet on chain {}, requesting switch to {}", current, CHAIN_ID_HEX);
        match Self::request(
            "wallet_switchEthereumChain",
            serde_json::json!([{ "chainId": CHAIN_ID_HEX }]),
        )
        .await
        {
            Ok(_) => Ok(()),
            Err(WalletError::ConnectionFailed(msg)) => Err(WalletError::WrongNetwork(msg)),
            Err(e) => Err(e),
        }
    }

    /// Hand a transaction to the wallet for signing and broadcast.
    ///
    /// # Returns
    /// The transaction hash on success.
    pub async fn send_transaction(tx: &TxRequest) -> Result<String, WalletError> {
        log::info!("Submitting transaction to {} via wallet", tx.to);
        let result = match Self::request("eth_sendTransaction", serde_json::json!([tx])).await {
            Ok(v) => v,
            Err(WalletError::ConnectionFailed(msg)) => {
                return Err(WalletError::TransactionRejected(msg))
            }
            Err(e) => return Err(e),
        };

        let hash = result
            .as_string()
            .ok_or_else(|| WalletError::JavaScriptError("Tx hash is not a string".to_string()))?;
        log::info!("Transaction submitted: {}", hash);
        Ok(hash)
    }
}

/// Pull a readable message out of a rejected provider promise.
fn js_error_message(error: &JsValue) -> String {
    Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}
