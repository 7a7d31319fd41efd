use chrono::{DateTime, Utc};
use healthbreak_models::{category::ReminderCategory, config::ReminderConfig};

use crate::trigger::TriggerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    Idle,
    Counting,
    Paused,
}

/// Read-only view of a clock for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockStatus {
    pub category: ReminderCategory,
    pub enabled: bool,
    pub remaining_seconds: u32,
    pub formatted: String,
}

/// Countdown of a single category.
///
/// The clock has no timer of its own: it advances only when the owner calls
/// [`ReminderClock::tick`], and ignores ticks unless it is counting.
#[derive(Debug, Clone)]
pub struct ReminderClock {
    category: ReminderCategory,
    interval_seconds: u32,
    remaining_seconds: u32,
    enabled: bool,
    phase: ClockPhase,
}

impl ReminderClock {
    pub fn new(category: ReminderCategory, config: ReminderConfig) -> Self {
        Self {
            category,
            interval_seconds: config.interval_seconds(),
            remaining_seconds: 0,
            enabled: config.enabled(),
            phase: ClockPhase::Idle,
        }
    }

    pub fn category(&self) -> ReminderCategory {
        self.category
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_seconds(&self) -> u32 {
        self.interval_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    /// Arms the clock with a full interval. A disabled config leaves the clock idle.
    pub fn start(&mut self, config: ReminderConfig) {
        self.enabled = config.enabled();
        self.interval_seconds = config.interval_seconds();

        if !self.enabled {
            self.remaining_seconds = 0;
            self.phase = ClockPhase::Idle;
            return;
        }

        self.remaining_seconds = self.interval_seconds;
        self.phase = ClockPhase::Counting;
    }

    /// Takes a new config without arming. Only an idle clock accepts it.
    pub fn configure(&mut self, config: ReminderConfig) {
        if self.phase == ClockPhase::Idle {
            self.enabled = config.enabled();
            self.interval_seconds = config.interval_seconds();
        }
    }

    /// Advances the countdown by one second. Returns the trigger when the
    /// countdown reaches zero, after re-arming with the full interval.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TriggerEvent> {
        if self.phase != ClockPhase::Counting {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        self.remaining_seconds = self.interval_seconds;
        Some(TriggerEvent::from_clock(self.category, now))
    }

    pub fn pause(&mut self) {
        if self.phase == ClockPhase::Counting {
            self.phase = ClockPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == ClockPhase::Paused {
            self.phase = ClockPhase::Counting;
        }
    }

    pub fn stop(&mut self) {
        self.phase = ClockPhase::Idle;
        self.remaining_seconds = 0;
    }

    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    pub fn status(&self) -> ClockStatus {
        ClockStatus {
            category: self.category,
            enabled: self.enabled,
            remaining_seconds: self.remaining_seconds,
            formatted: self.format_remaining(),
        }
    }
}
