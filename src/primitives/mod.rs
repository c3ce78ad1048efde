//! Primitive value types shared by the state, runtime and contracts.

pub mod address;
pub mod hash;
pub mod u256;

pub use address::{Address, AddressParseError};
pub use hash::TxHash;
pub use u256::{checked_exp10, format_units, parse_ether, parse_units, to_wei, AmountParseError, ETHER_DECIMALS, U256};
