use crate::domain::ports::SettingsStore;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing per-event settings.
pub const CF_SETTINGS: &str = "settings";

/// Separates the event slug from the setting key inside a RocksDB key.
const KEY_SEPARATOR: u8 = 0;

/// A persistent settings store backed by RocksDB.
///
/// Entries are keyed by `event \0 key` in a dedicated column family.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBSettingsStore {
    db: Arc<DB>,
}

impl RocksDBSettingsStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "settings" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_settings = ColumnFamilyDescriptor::new(CF_SETTINGS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_settings])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn settings_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_SETTINGS).ok_or_else(|| {
            ProviderError::InternalError(Box::new(std::io::Error::other(
                "Settings column family not found",
            )))
        })
    }

    fn compose_key(event: &str, key: &str) -> Vec<u8> {
        let mut composed = Vec::with_capacity(event.len() + key.len() + 1);
        composed.extend_from_slice(event.as_bytes());
        composed.push(KEY_SEPARATOR);
        composed.extend_from_slice(key.as_bytes());
        composed
    }
}

fn decode_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        ProviderError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Stored setting is not UTF-8: {}", e),
        )))
    })
}

#[async_trait]
impl SettingsStore for RocksDBSettingsStore {
    async fn get(&self, event: &str, key: &str) -> Result<Option<String>> {
        let cf = self.settings_cf()?;
        match self.db.get_cf(cf, Self::compose_key(event, key))? {
            Some(bytes) => Ok(Some(decode_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, event: &str, key: &str, value: &str) -> Result<()> {
        let cf = self.settings_cf()?;
        self.db
            .put_cf(cf, Self::compose_key(event, key), value.as_bytes())?;
        Ok(())
    }

    async fn events(&self) -> Result<Vec<String>> {
        let cf = self.settings_cf()?;
        let mut events = BTreeSet::new();

        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key, value) = item?;
            if value.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            if let Some(split) = key.iter().position(|b| *b == KEY_SEPARATOR) {
                events.insert(decode_utf8(key[..split].to_vec())?);
            }
        }

        Ok(events.into_iter().collect())
    }
}
