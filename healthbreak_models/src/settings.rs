use serde::{Deserialize, Serialize};

use crate::{
    category::ReminderCategory,
    config::{ReminderConfig, ReminderConfigSet},
};

pub const DEFAULT_DISPLAY_DURATION_SECONDS: u32 = 20;

/// Persisted settings of a single category, in user-facing units.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub interval_minutes: i64,
    #[serde(default = "default_display_duration")]
    pub duration_seconds: i64,
}

impl ReminderSettings {
    pub fn defaults_for(category: ReminderCategory) -> Self {
        Self {
            enabled: true,
            interval_minutes: i64::from(category.default_interval_minutes()),
            duration_seconds: i64::from(DEFAULT_DISPLAY_DURATION_SECONDS),
        }
    }

    pub fn to_config(&self) -> ReminderConfig {
        ReminderConfig::new(
            self.enabled,
            self.interval_minutes.saturating_mul(60),
            self.duration_seconds,
        )
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthSettings {
    #[serde(default = "eyes_defaults")]
    pub eyes: ReminderSettings,
    #[serde(default = "water_defaults")]
    pub water: ReminderSettings,
    #[serde(default = "standup_defaults")]
    pub standup: ReminderSettings,
    #[serde(default)]
    pub force_focus_mode: bool,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            eyes: eyes_defaults(),
            water: water_defaults(),
            standup: standup_defaults(),
            force_focus_mode: false,
        }
    }
}

impl HealthSettings {
    pub fn settings_for(&self, category: ReminderCategory) -> &ReminderSettings {
        match category {
            ReminderCategory::Eyes => &self.eyes,
            ReminderCategory::Water => &self.water,
            ReminderCategory::Standup => &self.standup,
        }
    }

    pub fn settings_for_mut(&mut self, category: ReminderCategory) -> &mut ReminderSettings {
        match category {
            ReminderCategory::Eyes => &mut self.eyes,
            ReminderCategory::Water => &mut self.water,
            ReminderCategory::Standup => &mut self.standup,
        }
    }

    pub fn reminder_configs(&self) -> ReminderConfigSet {
        ReminderConfigSet::new(|category| self.settings_for(category).to_config())
    }
}

fn default_true() -> bool {
    true
}

fn default_display_duration() -> i64 {
    i64::from(DEFAULT_DISPLAY_DURATION_SECONDS)
}

fn eyes_defaults() -> ReminderSettings {
    ReminderSettings::defaults_for(ReminderCategory::Eyes)
}

fn water_defaults() -> ReminderSettings {
    ReminderSettings::defaults_for(ReminderCategory::Water)
}

fn standup_defaults() -> ReminderSettings {
    ReminderSettings::defaults_for(ReminderCategory::Standup)
}
