/// Shared constants used across the chain-facing modules
///
/// This module centralizes the deployment and protocol constants so the
/// RPC, wallet and contract layers all read from one place.

// ============================================================================
// Deployment
// ============================================================================

/// Deployed crowdfunding contract (Sepolia)
pub const CROWDFUND_CONTRACT_ADDRESS: &str = "0x3fB4819cDD5F3285690DD33B57F0fdB6BBba0edE";

/// Sepolia chain id (11155111) as the 0x-prefixed hex string the wallet
/// provider expects
pub const CHAIN_ID_HEX: &str = "0xaa36a7";

/// Public JSON-RPC endpoints used for read calls.
/// Writes never go here; they are signed and broadcast by the wallet.
pub const RPC_ENDPOINTS: &[&str] = &[
    "https://ethereum-sepolia-rpc.publicnode.com",
    "https://rpc.sepolia.org",
    "https://sepolia.drpc.org",
];

// ============================================================================
// ABI layout
// ============================================================================

/// Size of one ABI word
pub const ABI_WORD_SIZE: usize = 32;

/// Size of a function selector
pub const SELECTOR_SIZE: usize = 4;

// ============================================================================
// Units
// ============================================================================

/// Decimal places of the display unit (1 ether = 10^18 wei)
pub const ETH_DECIMALS: u32 = 18;
