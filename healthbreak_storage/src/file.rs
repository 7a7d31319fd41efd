use std::path::{Path, PathBuf};

use async_trait::async_trait;
use healthbreak_models::settings::HealthSettings;

use crate::settings_store::{SettingsStore, SettingsStoreError};

/// Keeps the settings record as a JSON document on disk.
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> HealthSettings {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No settings at {}, using defaults",
                    self.path.display()
                );
                return HealthSettings::default();
            }
            Err(e) => {
                log::warn!(
                    "Unable to read settings at {}, using defaults: {e}",
                    self.path.display()
                );
                return HealthSettings::default();
            }
        };

        serde_json::from_slice(&contents).unwrap_or_else(|e| {
            log::warn!(
                "Settings at {} are corrupt, using defaults: {e}",
                self.path.display()
            );
            HealthSettings::default()
        })
    }

    async fn save(&self, settings: &HealthSettings) -> Result<(), SettingsStoreError> {
        let contents = serde_json::to_vec_pretty(settings)?;
        let temp_path = self.temp_path();
        let write_error = |source: std::io::Error| SettingsStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(&temp_path, contents)
            .await
            .map_err(write_error)?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(write_error)?;

        log::info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}
