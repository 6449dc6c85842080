use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use crate::key::Key;
use crate::scalar::StorageValue;
use crate::scope::WriteScope;
use crate::slot::{Slot, SlotError};

/// A simple key-value store for encoded slot contents.
///
/// Stores operate on raw bytes; encoding is handled by [`StoreSlot`]. Stores
/// have no knowledge of scalar types or write scopes.
///
/// All methods take `&self` to support stores with internal locking (e.g., RocksDB).
pub trait Store: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieves the bytes associated with a key, or None if not present.
    fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Stores bytes at the given key.
    fn put(&self, key: &Key, value: &[u8]) -> Result<(), Self::Error>;

    /// Removes the entry for a key. Removing a missing key is not an error.
    fn delete(&self, key: &Key) -> Result<(), Self::Error>;

    /// Checks whether a key exists in the store.
    fn has(&self, key: &Key) -> Result<bool, Self::Error>;
}

/// An in-memory store backed by a HashMap.
///
/// Useful for testing and as a reference implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<Key, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.data.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &Key, value: &[u8]) -> Result<(), Self::Error> {
        self.data.write().unwrap().insert(*key, value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &Key) -> Result<(), Self::Error> {
        self.data.write().unwrap().remove(key);
        Ok(())
    }

    fn has(&self, key: &Key) -> Result<bool, Self::Error> {
        Ok(self.data.read().unwrap().contains_key(key))
    }
}

/// A slot stored under one key of a [`Store`].
///
/// Values are kept as CBOR; an empty slot has no entry at all. Writes are only
/// accepted while the shared [`WriteScope`] is active.
pub struct StoreSlot<S: Store> {
    store: Arc<S>,
    scope: Arc<WriteScope>,
    key: Key,
}

impl<S: Store> StoreSlot<S> {
    pub fn new(store: Arc<S>, scope: Arc<WriteScope>, key: Key) -> Self {
        StoreSlot { store, scope, key }
    }

    /// Returns the key this slot is stored under.
    pub fn key(&self) -> Key {
        self.key
    }
}

impl<S: Store> Slot for StoreSlot<S> {
    fn read_raw(&self) -> Result<Option<StorageValue>, SlotError> {
        let Some(bytes) = self.store.get(&self.key).map_err(backend)? else {
            return Ok(None);
        };
        StorageValue::from_bytes(&bytes)
            .map(Some)
            .map_err(|err| SlotError::Corrupt(format!("{}: {}", self.key, err)))
    }

    fn write_raw(&self, value: Option<StorageValue>) -> Result<(), SlotError> {
        self.scope.check()?;
        log::trace!("slot {} <- {:?}", self.key, value);
        let result = match value {
            Some(value) => self.store.put(&self.key, &value.to_bytes()),
            None => self.store.delete(&self.key),
        };
        result.map_err(backend)
    }
}

fn backend<E: std::error::Error + Send + Sync + 'static>(err: E) -> SlotError {
    SlotError::Backend(Box::new(err))
}
