//! 20-byte account / contract addresses.

use crate::utils::serde_helpers::{decode_fixed_hex, serde_via_str};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid address: {0}")]
pub struct AddressParseError(String);

/// Account or contract address, rendered as `0x` + 40 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; Address::LEN]);

impl Address {
    pub const LEN: usize = 20;
    pub const ZERO: Address = Address([0u8; Address::LEN]);

    pub const fn new(bytes: [u8; Address::LEN]) -> Self {
        Self(bytes)
    }

    /// Derive an address from the last 20 bytes of `sha256(part_0 || part_1 || ...)`.
    pub fn derive(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for p in parts {
            hasher.update(p);
        }
        let digest = hasher.finalize();
        let mut out = [0u8; Address::LEN];
        out.copy_from_slice(&digest[digest.len() - Address::LEN..]);
        Self(out)
    }

    /// Address of a contract created by `deployer` with its nonce at `nonce`.
    pub fn contract(deployer: &Address, nonce: u64) -> Self {
        Self::derive(&[b"create", deployer.as_bytes(), &nonce.to_be_bytes()])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<{ Address::LEN }>(s)
            .map(Address)
            .map_err(|e| AddressParseError(format!("{}: {}", s, e)))
    }
}

serde_via_str!(Address, Address::from_str);
