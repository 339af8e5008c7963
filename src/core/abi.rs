use sha3::{Digest, Keccak256};
use std::fmt;

use super::constants::{ABI_WORD_SIZE, SELECTOR_SIZE};

/// Minimal ABI codec for the handful of types the crowdfunding contract
/// uses: `address`, `uint256`, `string` and dynamic arrays of them.
///
/// Encoding follows the standard head/tail layout; decoding is
/// bounds-checked at every offset so malformed node responses surface as
/// `AbiError` instead of panics.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    InvalidHex(String),
    InvalidAddress(String),
    TruncatedData(String),
    InvalidOffset(String),
    ValueOutOfRange(String),
    InvalidUtf8(String),
    LengthMismatch(String),
}

impl fmt::Display for AbiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiError::InvalidHex(msg) => write!(f, "Invalid hex data: {}", msg),
            AbiError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            AbiError::TruncatedData(msg) => write!(f, "Truncated ABI data: {}", msg),
            AbiError::InvalidOffset(msg) => write!(f, "Invalid ABI offset: {}", msg),
            AbiError::ValueOutOfRange(msg) => write!(f, "Value out of range: {}", msg),
            AbiError::InvalidUtf8(msg) => write!(f, "Invalid UTF-8 string: {}", msg),
            AbiError::LengthMismatch(msg) => write!(f, "Length mismatch: {}", msg),
        }
    }
}

/// Compute the 4-byte function selector for a canonical signature,
/// e.g. `createCampaign(address,string,string,uint256,uint256,string)`.
pub fn selector(signature: &str) -> [u8; SELECTOR_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; SELECTOR_SIZE];
    out.copy_from_slice(&digest[..SELECTOR_SIZE]);
    out
}

/// An argument value for an encoded contract call.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Address([u8; 20]),
    Uint(u128),
    Str(String),
}

/// Parse a 0x-prefixed 20-byte hex address.
pub fn parse_address(s: &str) -> Result<[u8; 20], AbiError> {
    let h = s.strip_prefix("0x").unwrap_or(s);
    if h.len() != 40 {
        return Err(AbiError::InvalidAddress(s.to_string()));
    }
    let bytes = hex::decode(h).map_err(|_| AbiError::InvalidAddress(s.to_string()))?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Format 20 address bytes as lowercase 0x-prefixed hex.
pub fn format_address(bytes: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Strip the 0x prefix and decode a JSON-RPC hex payload.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    let h = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(h).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

/// Encode bytes as 0x-prefixed hex for a JSON-RPC payload.
pub fn encode_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn uint_word(value: u128) -> [u8; ABI_WORD_SIZE] {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(addr: &[u8; 20]) -> [u8; ABI_WORD_SIZE] {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[12..].copy_from_slice(addr);
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(ABI_WORD_SIZE) * ABI_WORD_SIZE
}

/// Head/tail-encode a function call: selector followed by the argument
/// block. Static values sit in the head; strings go to the tail behind an
/// offset word.
pub fn encode_call(selector: [u8; SELECTOR_SIZE], args: &[Token]) -> Vec<u8> {
    let head_size = args.len() * ABI_WORD_SIZE;
    let mut heads: Vec<u8> = Vec::with_capacity(head_size);
    let mut tail: Vec<u8> = Vec::new();

    for arg in args {
        match arg {
            Token::Address(addr) => heads.extend_from_slice(&address_word(addr)),
            Token::Uint(value) => heads.extend_from_slice(&uint_word(*value)),
            Token::Str(s) => {
                heads.extend_from_slice(&uint_word((head_size + tail.len()) as u128));
                let bytes = s.as_bytes();
                tail.extend_from_slice(&uint_word(bytes.len() as u128));
                tail.extend_from_slice(bytes);
                tail.resize(tail.len() + padded_len(bytes.len()) - bytes.len(), 0);
            }
        }
    }

    let mut out = Vec::with_capacity(SELECTOR_SIZE + head_size + tail.len());
    out.extend_from_slice(&selector);
    out.extend_from_slice(&heads);
    out.extend_from_slice(&tail);
    out
}

/// Bounds-checked reader over an ABI-encoded return payload.
///
/// All offsets are absolute byte positions into `data`; callers resolve
/// relative offsets with `offset_at` before dereferencing.
pub struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn word(&self, offset: usize) -> Result<&'a [u8], AbiError> {
        let end = offset
            .checked_add(ABI_WORD_SIZE)
            .ok_or_else(|| AbiError::InvalidOffset(format!("offset {} overflows", offset)))?;
        if end > self.data.len() {
            return Err(AbiError::TruncatedData(format!(
                "need {} bytes, have {}",
                end,
                self.data.len()
            )));
        }
        Ok(&self.data[offset..end])
    }

    /// Read a uint256 word into u128, rejecting values above 2^128-1.
    pub fn uint_at(&self, offset: usize) -> Result<u128, AbiError> {
        let word = self.word(offset)?;
        if word[..16].iter().any(|&b| b != 0) {
            return Err(AbiError::ValueOutOfRange(format!(
                "uint256 at byte {} exceeds u128",
                offset
            )));
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(buf))
    }

    /// Read a uint256 word that must fit in u64 (timestamps, counters).
    pub fn u64_at(&self, offset: usize) -> Result<u64, AbiError> {
        let value = self.uint_at(offset)?;
        u64::try_from(value).map_err(|_| {
            AbiError::ValueOutOfRange(format!("uint256 at byte {} exceeds u64", offset))
        })
    }

    /// Read an address word as lowercase 0x-prefixed hex.
    pub fn address_at(&self, offset: usize) -> Result<String, AbiError> {
        let word = self.word(offset)?;
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&word[12..]);
        Ok(format_address(&addr))
    }

    /// Resolve a relative offset word against its base position.
    pub fn offset_at(&self, offset: usize, base: usize) -> Result<usize, AbiError> {
        let relative = self.uint_at(offset)?;
        let relative = usize::try_from(relative)
            .map_err(|_| AbiError::InvalidOffset(format!("offset at byte {} too large", offset)))?;
        let absolute = base
            .checked_add(relative)
            .ok_or_else(|| AbiError::InvalidOffset(format!("offset at byte {} overflows", offset)))?;
        if absolute.checked_add(ABI_WORD_SIZE).is_none() || absolute + ABI_WORD_SIZE > self.data.len() {
            return Err(AbiError::InvalidOffset(format!(
                "offset at byte {} points past the payload",
                offset
            )));
        }
        Ok(absolute)
    }

    /// Read a dynamic string whose length word sits at `offset`.
    pub fn string_at(&self, offset: usize) -> Result<String, AbiError> {
        let len = self.uint_at(offset)?;
        let len = usize::try_from(len)
            .map_err(|_| AbiError::ValueOutOfRange(format!("string length at byte {}", offset)))?;
        let start = offset + ABI_WORD_SIZE;
        let end = start
            .checked_add(len)
            .ok_or_else(|| AbiError::InvalidOffset(format!("string at byte {} overflows", offset)))?;
        if end > self.data.len() {
            return Err(AbiError::TruncatedData(format!(
                "string of {} bytes at byte {}",
                len, start
            )));
        }
        String::from_utf8(self.data[start..end].to_vec())
            .map_err(|e| AbiError::InvalidUtf8(e.to_string()))
    }

    /// Read the length word of a dynamic array at `offset`, returning the
    /// length and the byte position of the first element.
    pub fn array_at(&self, offset: usize) -> Result<(usize, usize), AbiError> {
        let len = self.uint_at(offset)?;
        let len = usize::try_from(len)
            .map_err(|_| AbiError::ValueOutOfRange(format!("array length at byte {}", offset)))?;
        let start = offset + ABI_WORD_SIZE;
        // every element occupies at least one word in the element block
        if len
            .checked_mul(ABI_WORD_SIZE)
            .and_then(|b| start.checked_add(b))
            .map(|end| end > self.data.len())
            .unwrap_or(true)
        {
            return Err(AbiError::TruncatedData(format!(
                "array of {} elements at byte {}",
                len, offset
            )));
        }
        Ok((len, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_of(value: u128) -> Vec<u8> {
        uint_word(value).to_vec()
    }

    #[test]
    fn selector_is_first_four_keccak_bytes() {
        let sig = "donateToCampaign(uint256)";
        let mut hasher = Keccak256::new();
        hasher.update(sig.as_bytes());
        let digest = hasher.finalize();
        assert_eq!(selector(sig), &digest[..4]);
        // distinct signatures must not collide on their prefixes here
        assert_ne!(selector(sig), selector("getCampaigns()"));
    }

    #[test]
    fn encodes_static_arguments_in_place() {
        let addr = parse_address("0x3fB4819cDD5F3285690DD33B57F0fdB6BBba0edE").unwrap();
        let data = encode_call([0xAA; 4], &[Token::Address(addr), Token::Uint(7)]);

        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xAA; 4]);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], &addr);
        assert_eq!(&data[36..68], &word_of(7)[..]);
    }

    #[test]
    fn encodes_strings_behind_offsets() {
        let data = encode_call([0; 4], &[Token::Uint(1), Token::Str("hello".to_string())]);
        let body = &data[4..];
        let dec = Decoder::new(body);

        assert_eq!(dec.uint_at(0).unwrap(), 1);
        // offset word points at the tail, relative to the argument block
        let s_off = dec.offset_at(32, 0).unwrap();
        assert_eq!(s_off, 64);
        assert_eq!(dec.string_at(s_off).unwrap(), "hello");
        // "hello" padded to a full word
        assert_eq!(body.len(), 64 + 32 + 32);
    }

    #[test]
    fn round_trips_the_create_campaign_argument_list() {
        let owner = parse_address("0x00000000000000000000000000000000000000a1").unwrap();
        let args = [
            Token::Address(owner),
            Token::Str("Title".to_string()),
            Token::Str("A long description of the campaign".to_string()),
            Token::Uint(500_000_000_000_000_000),
            Token::Uint(1_760_000_000),
            Token::Str("https://example.com/img.png".to_string()),
        ];
        let data = encode_call(selector("createCampaign(address,string,string,uint256,uint256,string)"), &args);
        let body = &data[4..];
        let dec = Decoder::new(body);

        assert_eq!(
            dec.address_at(0).unwrap(),
            "0x00000000000000000000000000000000000000a1"
        );
        let title_off = dec.offset_at(32, 0).unwrap();
        assert_eq!(dec.string_at(title_off).unwrap(), "Title");
        let desc_off = dec.offset_at(64, 0).unwrap();
        assert_eq!(
            dec.string_at(desc_off).unwrap(),
            "A long description of the campaign"
        );
        assert_eq!(dec.uint_at(96).unwrap(), 500_000_000_000_000_000);
        assert_eq!(dec.u64_at(128).unwrap(), 1_760_000_000);
        let img_off = dec.offset_at(160, 0).unwrap();
        assert_eq!(dec.string_at(img_off).unwrap(), "https://example.com/img.png");
    }

    #[test]
    fn rejects_uint256_values_beyond_u128() {
        let mut data = vec![0u8; 32];
        data[0] = 1;
        let dec = Decoder::new(&data);
        assert!(matches!(dec.uint_at(0), Err(AbiError::ValueOutOfRange(_))));
    }

    #[test]
    fn rejects_out_of_bounds_reads() {
        let data = word_of(64);
        let dec = Decoder::new(&data);
        assert!(dec.uint_at(8).is_err());
        assert!(matches!(dec.offset_at(0, 0), Err(AbiError::InvalidOffset(_))));

        // string length word claiming more bytes than the payload holds
        let mut truncated = word_of(100);
        truncated.extend_from_slice(&[0u8; 8]);
        let dec = Decoder::new(&truncated);
        assert!(matches!(dec.string_at(0), Err(AbiError::TruncatedData(_))));
    }

    #[test]
    fn parses_and_formats_addresses() {
        let s = "0x3fB4819cDD5F3285690DD33B57F0fdB6BBba0edE";
        let bytes = parse_address(s).unwrap();
        assert_eq!(format_address(&bytes), s.to_lowercase());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("not-an-address").is_err());
    }
}
