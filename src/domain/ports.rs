use crate::error::Result;
use async_trait::async_trait;

/// Per-event key-value storage for provider settings.
///
/// Keys are opaque strings; namespacing is the caller's concern.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, event: &str, key: &str) -> Result<Option<String>>;
    async fn set(&self, event: &str, key: &str, value: &str) -> Result<()>;
    /// Distinct events holding at least one non-blank setting, sorted.
    async fn events(&self) -> Result<Vec<String>>;
}

pub type SettingsStoreBox = Box<dyn SettingsStore>;

/// Produces new handles onto a shared settings backend.
pub type SettingsStoreFactory = Box<dyn Fn() -> SettingsStoreBox + Send + Sync>;
