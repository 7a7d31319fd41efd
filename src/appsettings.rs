use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings {
    pub settings_path: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SchedulerSettings {
    pub autostart: bool,
    pub tick_millis: u64,
}

impl SchedulerSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub scheduler: SchedulerSettings,
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("storage.settings_path", "healthbreak-settings.json")?
            .set_default("scheduler.autostart", true)?
            .set_default("scheduler.tick_millis", 1000)
    }
}
