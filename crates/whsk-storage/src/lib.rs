use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;
use whsk_types::{Address, ChainId};

pub const WALLET_ADDRESS_KEY: &str = "walletAddress";
pub const CHAIN_ID_KEY: &str = "chainId";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// Synchronous string key-value store (browser `localStorage` shaped).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        store
            .entries
            .borrow_mut()
            .extend(entries.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())));
        store
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Keys under which the session is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub address: String,
    pub chain_id: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            address: WALLET_ADDRESS_KEY.to_owned(),
            chain_id: CHAIN_ID_KEY.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
}

/// Persistence of the two session entries. Write failures are logged and
/// swallowed: the in-memory session stays authoritative.
pub struct SessionStore<S> {
    store: S,
    keys: SessionKeys,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S, keys: SessionKeys) -> Self {
        Self { store, keys }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> StoredSession {
        let account = self
            .read(&self.keys.address)
            .filter(|a| !a.is_empty())
            .map(Address);
        let chain_id = self.read(&self.keys.chain_id).and_then(|raw| {
            ChainId::from_decimal(&raw)
                .map_err(|err| warn!("ignoring stored chain id: {err}"))
                .ok()
        });
        StoredSession { account, chain_id }
    }

    pub fn save_account(&self, account: &Address) {
        self.write(&self.keys.address, account.as_str());
    }

    pub fn save_chain_id(&self, chain_id: ChainId) {
        self.write(&self.keys.chain_id, &chain_id.to_string());
    }

    pub fn clear(&self) {
        for key in [&self.keys.address, &self.keys.chain_id] {
            if let Err(err) = self.store.remove(key) {
                warn!(key = %key, "failed to remove session entry: {err}");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, "failed to read session entry: {err}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, "failed to write session entry: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_decimal_chain_id() {
        let store = InMemoryStore::with_entries([("walletAddress", "0xabc"), ("chainId", "133")]);
        let sessions = SessionStore::new(store, SessionKeys::default());
        let loaded = sessions.load();
        assert_eq!(loaded.account, Some(Address("0xabc".to_owned())));
        assert_eq!(loaded.chain_id, Some(ChainId(133)));
    }

    #[test]
    fn malformed_or_empty_entries_load_as_absent() {
        let store = InMemoryStore::with_entries([("walletAddress", ""), ("chainId", "0x85")]);
        let sessions = SessionStore::new(store, SessionKeys::default());
        assert_eq!(sessions.load(), StoredSession::default());
    }

    #[test]
    fn save_and_clear() {
        let sessions = SessionStore::new(InMemoryStore::new(), SessionKeys::default());
        sessions.save_account(&Address("0xabc".to_owned()));
        sessions.save_chain_id(ChainId(133));
        assert_eq!(sessions.inner().get("chainId").unwrap(), Some("133".to_owned()));
        assert_eq!(sessions.inner().len(), 2);

        sessions.clear();
        assert!(sessions.inner().is_empty());
    }
}
