//! RocksDB-backed slot store for Hydroxyl.
//!
//! Slot contents live in their own column family, so an engine can share one
//! database between its own records and the optional fields of its objects.

use std::path::Path;

use hydroxyl_core::{Key, Store};
use rocksdb::{ColumnFamily, DB, Options};
use thiserror::Error;

/// Column family holding encoded slot values.
pub const SLOTS_CF: &str = "hydroxyl_slots";

#[derive(Debug, Error)]
pub enum RocksError {
    #[error("RocksDB error: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("column family {0} is missing")]
    MissingColumnFamily(&'static str),
}

/// A persistent slot store backed by RocksDB.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Opens the store at the given path for reading and writing.
    ///
    /// Creates the database and the slot column family if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RocksError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        let db = DB::open_cf(&opts, path, [SLOTS_CF])?;
        Ok(Self { db })
    }

    /// Opens an existing store without write access.
    ///
    /// Every write is rejected by RocksDB and surfaces as a backend error
    /// from the slots built on top of this store.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, RocksError> {
        let opts = Options::default();
        let db = DB::open_cf_for_read_only(&opts, path, [SLOTS_CF], false)?;
        Ok(Self { db })
    }

    fn slots(&self) -> Result<&ColumnFamily, RocksError> {
        self.db
            .cf_handle(SLOTS_CF)
            .ok_or(RocksError::MissingColumnFamily(SLOTS_CF))
    }
}

impl Store for RocksStore {
    type Error = RocksError;

    fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.db.get_cf(self.slots()?, key.as_bytes())?)
    }

    fn put(&self, key: &Key, value: &[u8]) -> Result<(), Self::Error> {
        self.db.put_cf(self.slots()?, key.as_bytes(), value)?;
        Ok(())
    }

    fn delete(&self, key: &Key) -> Result<(), Self::Error> {
        self.db.delete_cf(self.slots()?, key.as_bytes())?;
        Ok(())
    }

    fn has(&self, key: &Key) -> Result<bool, Self::Error> {
        Ok(self.db.get_pinned_cf(self.slots()?, key.as_bytes())?.is_some())
    }
}
