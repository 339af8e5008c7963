pub mod abi;
pub mod campaign;
pub mod constants;
pub mod rpc;
pub mod units;
pub mod utils;
pub mod wallet;
