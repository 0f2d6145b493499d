use crate::domain::ports::SettingsStore;
use crate::domain::settings::{ProviderSettings, SettingKey};
use crate::error::Result;

/// Keyed access to the provider's namespaced settings for one event.
pub struct ProviderSettingsHandle<'a> {
    store: &'a dyn SettingsStore,
    event: &'a str,
}

impl<'a> ProviderSettingsHandle<'a> {
    pub fn new(store: &'a dyn SettingsStore, event: &'a str) -> Self {
        Self { store, event }
    }

    /// Raw stored value, `None` when unset.
    pub async fn get(&self, key: SettingKey) -> Result<Option<String>> {
        self.store.get(self.event, &key.storage_key()).await
    }

    /// Stores `value` without validation.
    pub async fn set(&self, key: SettingKey, value: &str) -> Result<()> {
        self.store.set(self.event, &key.storage_key(), value).await
    }

    /// Validates `value` for `key`, then stores it trimmed.
    ///
    /// A blank value clears the setting.
    pub async fn save(&self, key: SettingKey, value: &str) -> Result<()> {
        let value = value.trim();
        if !value.is_empty() {
            key.validate(value)?;
        }
        self.set(key, value).await
    }

    pub async fn load(&self) -> Result<ProviderSettings> {
        ProviderSettings::load(self.store, self.event).await
    }
}
