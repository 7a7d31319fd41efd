use std::collections::BTreeMap;

use crate::category::ReminderCategory;

/// Resolved per-category configuration the scheduler runs with.
///
/// Values below 1 are raised to 1 when the config is built, so a clock never
/// has to validate its interval while ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    enabled: bool,
    interval_seconds: u32,
    display_duration_seconds: u32,
}

impl ReminderConfig {
    pub const MIN_SECONDS: u32 = 1;

    pub fn new(enabled: bool, interval_seconds: i64, display_duration_seconds: i64) -> Self {
        Self {
            enabled,
            interval_seconds: clamp_seconds(interval_seconds),
            display_duration_seconds: clamp_seconds(display_duration_seconds),
        }
    }

    pub fn disabled(interval_seconds: i64) -> Self {
        Self::new(false, interval_seconds, i64::from(Self::MIN_SECONDS))
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_seconds(&self) -> u32 {
        self.interval_seconds
    }

    pub fn display_duration_seconds(&self) -> u32 {
        self.display_duration_seconds
    }
}

fn clamp_seconds(value: i64) -> u32 {
    value.clamp(i64::from(ReminderConfig::MIN_SECONDS), i64::from(u32::MAX)) as u32
}

/// Exactly one [`ReminderConfig`] per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfigSet(BTreeMap<ReminderCategory, ReminderConfig>);

impl ReminderConfigSet {
    pub fn new(configure: impl Fn(ReminderCategory) -> ReminderConfig) -> Self {
        Self(
            ReminderCategory::ALL
                .into_iter()
                .map(|category| (category, configure(category)))
                .collect(),
        )
    }

    pub fn get(&self, category: ReminderCategory) -> ReminderConfig {
        self.0[&category]
    }

    pub fn with(mut self, category: ReminderCategory, config: ReminderConfig) -> Self {
        self.0.insert(category, config);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReminderCategory, ReminderConfig)> + '_ {
        self.0.iter().map(|(category, config)| (*category, *config))
    }
}
