//! Account records and the persistence seam underneath the devnet.
//! - Account (nonce, optional deployed contract)
//! - AccountStore trait (pluggable persistence engine)
//! - InMemAccountStore (ordered map, used by the devnet and tests)

use crate::contracts::DeployedContract;
use crate::primitives::Address;
use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Account {
    /// number of transactions sent from this account
    pub nonce: u64,
    /// code + storage, present for contract accounts only
    pub contract: Option<DeployedContract>,
}

impl Account {
    pub fn external() -> Self {
        Self::default()
    }

    pub fn with_contract(contract: DeployedContract) -> Self {
        Self { nonce: 0, contract: Some(contract) }
    }

    pub fn is_contract(&self) -> bool {
        self.contract.is_some()
    }
}

/// Account key type
pub type AccountKey = Address;

/// Trait for an account persistence engine.
pub trait AccountStore: Send + Sync + 'static {
    fn get(&self, key: &AccountKey) -> Result<Option<Account>>;
    fn insert(&self, key: AccountKey, account: Account) -> Result<()>;
    fn remove(&self, key: &AccountKey) -> Result<()>;
    /// All accounts in ascending key order.
    fn entries(&self) -> Result<Vec<(AccountKey, Account)>>;
}

/// In-memory account store
#[derive(Debug, Default, Clone)]
pub struct InMemAccountStore {
    inner: Arc<RwLock<BTreeMap<AccountKey, Account>>>,
}

impl InMemAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Canonical bincode encoding of every account (keys in order).
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&*self.inner.read())?)
    }

    /// Replace the whole store with a previously encoded image.
    pub fn restore(&self, bytes: &[u8]) -> Result<()> {
        let map: BTreeMap<AccountKey, Account> = bincode::deserialize(bytes)?;
        *self.inner.write() = map;
        Ok(())
    }

    /// BLAKE3 digest of the canonical encoding.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        Ok(*blake3::hash(&self.encode()?).as_bytes())
    }
}

impl AccountStore for InMemAccountStore {
    fn get(&self, key: &AccountKey) -> Result<Option<Account>> {
        Ok(self.inner.read().get(key).cloned())
    }

    fn insert(&self, key: AccountKey, account: Account) -> Result<()> {
        self.inner.write().insert(key, account);
        Ok(())
    }

    fn remove(&self, key: &AccountKey) -> Result<()> {
        self.inner.write().remove(key);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(AccountKey, Account)>> {
        Ok(self.inner.read().iter().map(|(k, v)| (*k, v.clone())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let store = InMemAccountStore::new();
        let key = Address::derive(&[b"alice"]);
        assert!(store.get(&key).unwrap().is_none());
        store.insert(key, Account { nonce: 3, contract: None }).unwrap();
        assert_eq!(store.get(&key).unwrap().unwrap().nonce, 3);
        store.remove(&key).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn encode_restore_keeps_state_root() {
        let store = InMemAccountStore::new();
        for i in 0u64..5 {
            store.insert(Address::derive(&[&i.to_be_bytes()]), Account { nonce: i, contract: None }).unwrap();
        }
        let root = store.state_root().unwrap();
        let image = store.encode().unwrap();

        let other = InMemAccountStore::new();
        other.restore(&image).unwrap();
        assert_eq!(other.len(), 5);
        assert_eq!(other.state_root().unwrap(), root);
    }
}
