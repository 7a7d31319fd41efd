use std::path::PathBuf;

use async_trait::async_trait;
use healthbreak_models::settings::HealthSettings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error("Unable to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Source of the persisted [`HealthSettings`].
///
/// `load` never fails: a missing or unreadable record yields the defaults.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> HealthSettings;
    async fn save(&self, settings: &HealthSettings) -> Result<(), SettingsStoreError>;
}
