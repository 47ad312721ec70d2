//! redb table definitions and storage manager
//!
//! Defines all tables used for persisted registry state.

use std::path::PathBuf;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, info, instrument};

use crate::error::StorageError;

// Key: artifact id, Value: postcard-encoded ArtifactRecord
pub const ARTIFACTS: TableDefinition<u64, &[u8]> = TableDefinition::new("artifacts");

// Key: post index, Value: postcard-encoded Post
pub const POSTS: TableDefinition<u64, &[u8]> = TableDefinition::new("posts");

// Key: counter name, Value: next id/index to allocate
pub const REGISTRY_META: TableDefinition<&str, u64> = TableDefinition::new("registry_meta");

pub const NEXT_ARTIFACT_ID: &str = "next_artifact_id";
pub const NEXT_POST_INDEX: &str = "next_post_index";

/// Configuration for redb storage
#[derive(Debug, Clone)]
pub struct RedbStorageConfig {
    /// Path to the database file
    pub db_path: PathBuf,
    /// Cache size in bytes
    pub cache_size: usize,
}

impl Default for RedbStorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/mintboard.redb"),
            cache_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl RedbStorageConfig {
    pub fn with_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }
}

fn db_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(e.to_string())
}

/// Main redb storage manager
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open or create the database
    #[instrument(skip(config), fields(path = %config.db_path.display()))]
    pub fn open(config: RedbStorageConfig) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::builder()
            .set_cache_size(config.cache_size)
            .create(&config.db_path)
            .map_err(db_err)?;

        info!("Opened redb database");

        let storage = Self { db: Arc::new(db) };

        storage.init_tables()?;

        Ok(storage)
    }

    /// Create tables and counters if they don't exist
    fn init_tables(&self) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;

        write_txn.open_table(ARTIFACTS).map_err(db_err)?;
        write_txn.open_table(POSTS).map_err(db_err)?;
        {
            let mut meta = write_txn.open_table(REGISTRY_META).map_err(db_err)?;
            for key in [NEXT_ARTIFACT_ID, NEXT_POST_INDEX] {
                let present = meta.get(key).map_err(db_err)?.is_some();
                if !present {
                    meta.insert(key, 0u64).map_err(db_err)?;
                }
            }
        }

        write_txn.commit().map_err(db_err)?;

        debug!("Initialized redb tables");
        Ok(())
    }

    /// Read a counter from the meta table
    pub fn counter(&self, name: &str) -> Result<u64, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let meta = read_txn.open_table(REGISTRY_META).map_err(db_err)?;
        let value = meta
            .get(name)
            .map_err(db_err)?
            .map(|v| v.value())
            .unwrap_or(0);
        Ok(value)
    }

    /// Insert `value` at `key` and advance counter `name` to `key + 1`, in one
    /// write transaction. Fails without writing if `key` is not the counter's
    /// current value.
    pub fn append(
        &self,
        table: TableDefinition<u64, &[u8]>,
        name: &str,
        key: u64,
        value: &[u8],
    ) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;

        {
            let mut meta = write_txn.open_table(REGISTRY_META).map_err(db_err)?;
            let next = meta
                .get(name)
                .map_err(db_err)?
                .map(|v| v.value())
                .unwrap_or(0);
            if key != next {
                return Err(StorageError::OutOfOrder {
                    expected: next,
                    got: key,
                });
            }

            let mut table = write_txn.open_table(table).map_err(db_err)?;
            table.insert(key, value).map_err(db_err)?;
            meta.insert(name, next + 1).map_err(db_err)?;
        }

        write_txn.commit().map_err(db_err)?;

        Ok(())
    }

    /// Overwrite an existing entry. Fails with `NotFound` if `key` is absent.
    pub fn replace(
        &self,
        table: TableDefinition<u64, &[u8]>,
        key: u64,
        value: &[u8],
    ) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;

        {
            let mut table = write_txn.open_table(table).map_err(db_err)?;
            let present = table.get(key).map_err(db_err)?.is_some();
            if !present {
                return Err(StorageError::not_found(key.to_string()));
            }
            table.insert(key, value).map_err(db_err)?;
        }

        write_txn.commit().map_err(db_err)?;

        Ok(())
    }

    /// Get a value from a table
    pub fn get(
        &self,
        table: TableDefinition<u64, &[u8]>,
        key: u64,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn.open_table(table).map_err(db_err)?;

        let value = table
            .get(key)
            .map_err(db_err)?
            .map(|v| v.value().to_vec());

        Ok(value)
    }

    /// All values of a table in key order
    pub fn scan(&self, table: TableDefinition<u64, &[u8]>) -> Result<Vec<Vec<u8>>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn.open_table(table).map_err(db_err)?;

        let mut results = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_key, value) = entry.map_err(db_err)?;
            results.push(value.value().to_vec());
        }

        Ok(results)
    }
}
