use crate::domain::ports::SettingsStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory settings store.
///
/// Clones share the same underlying map, so several providers (or a factory)
/// can hand out handles onto one backend.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<HashMap<(String, String), String>>>,
}

impl InMemorySettingsStore {
    /// Creates a new, empty in-memory settings store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, event: &str, key: &str) -> Result<Option<String>> {
        let settings = self.settings.read().await;
        Ok(settings
            .get(&(event.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(&self, event: &str, key: &str, value: &str) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings.insert((event.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn events(&self) -> Result<Vec<String>> {
        let settings = self.settings.read().await;
        let events: BTreeSet<&String> = settings
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|((event, _), _)| event)
            .collect();
        Ok(events.into_iter().cloned().collect())
    }
}
