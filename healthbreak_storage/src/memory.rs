use async_trait::async_trait;
use healthbreak_models::settings::HealthSettings;
use tokio::sync::RwLock;

use crate::settings_store::{SettingsStore, SettingsStoreError};

#[derive(Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<Option<HealthSettings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: HealthSettings) -> Self {
        Self {
            settings: RwLock::new(Some(settings)),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> HealthSettings {
        self.settings.read().await.clone().unwrap_or_default()
    }

    async fn save(&self, settings: &HealthSettings) -> Result<(), SettingsStoreError> {
        *self.settings.write().await = Some(settings.clone());
        Ok(())
    }
}
