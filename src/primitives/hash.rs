use crate::utils::serde_helpers::{decode_fixed_hex, serde_via_str};
use std::fmt;
use std::str::FromStr;

/// 32-byte BLAKE3 digest identifying a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub fn compute(parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for p in parts {
            hasher.update(p);
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for TxHash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<32>(s).map(TxHash)
    }
}

serde_via_str!(TxHash, TxHash::from_str);
