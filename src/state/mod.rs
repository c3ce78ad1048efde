pub mod account_cache;
pub mod account_db;

pub use account_cache::AccountCache;
pub use account_db::{Account, AccountKey, AccountStore, InMemAccountStore};
