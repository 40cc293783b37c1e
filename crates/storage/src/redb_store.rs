use std::path::Path;

use redb::{Database, TableDefinition};

use crate::{error::StoreError, kv::KvStore};

const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("pex");

/// A [`KvStore`] backed by a single [`redb::Database`] file, the pure-Rust
/// embedded backend this workspace already carries for its other persistent
/// tables. Engine state (accounts, the standby queue) all lives in one flat
/// table keyed by the byte keys this crate constructs.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path)?;
        // Ensure the table exists before the first reader opens it.
        let txn = db.begin_write()?;
        txn.open_table(TABLE)?;
        txn.commit()?;
        Ok(Self { db })
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TABLE)?;
        Ok(table.get(key)?.map(|value| value.value().to_vec()))
    }

    fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TABLE)?;
            table.insert(key, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_value_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pex.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.set(b"k", vec![9, 9, 9]).unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(vec![9, 9, 9]));
    }
}
