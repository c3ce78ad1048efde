//! Write-back account overlay used as the journal of a single transaction.
//! - Reads fall through to the backing store and are cached
//! - Writes stay in the overlay, marked dirty
//! - `flush` commits dirty entries; dropping the overlay discards them (revert)

use crate::state::account_db::{Account, AccountKey, AccountStore};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache entry holds the account (None = known absent) plus dirty flag
#[derive(Debug, Clone)]
struct CacheEntry {
    account: Option<Account>,
    dirty: bool,
}

pub struct AccountCache {
    map: HashMap<AccountKey, CacheEntry>,
    store: Arc<dyn AccountStore>,
}

impl AccountCache {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { map: HashMap::new(), store }
    }

    /// Load account from overlay or backing store
    pub fn get(&mut self, key: &AccountKey) -> Result<Option<Account>> {
        if let Some(e) = self.map.get(key) {
            return Ok(e.account.clone());
        }
        let acc = self.store.get(key)?;
        self.map.insert(*key, CacheEntry { account: acc.clone(), dirty: false });
        Ok(acc)
    }

    /// Insert or overwrite an account in the overlay (mark dirty)
    pub fn insert(&mut self, key: AccountKey, account: Account) {
        self.map.insert(key, CacheEntry { account: Some(account), dirty: true });
    }

    /// Modify account via closure. Returns error if account missing.
    pub fn modify<F, R>(&mut self, key: &AccountKey, mutator: F) -> Result<R>
    where
        F: FnOnce(&mut Account) -> Result<R>,
    {
        let mut account = self
            .get(key)?
            .ok_or_else(|| anyhow::anyhow!("account {} not found", key))?;
        let out = mutator(&mut account)?;
        self.insert(*key, account);
        Ok(out)
    }

    pub fn dirty_count(&self) -> usize {
        self.map.values().filter(|e| e.dirty).count()
    }

    /// Write dirty entries back to the store. Returns how many were written.
    pub fn flush(self) -> Result<usize> {
        let mut written = 0;
        for (key, entry) in self.map {
            if !entry.dirty {
                continue;
            }
            match entry.account {
                Some(acc) => self.store.insert(key, acc)?,
                None => self.store.remove(&key)?,
            }
            written += 1;
        }
        Ok(written)
    }
}
