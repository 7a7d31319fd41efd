use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use healthbreak_models::{category::ReminderCategory, config::ReminderConfigSet};

use crate::{
    clock::{ClockStatus, ReminderClock},
    trigger::{TriggerEvent, TriggerSender},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
    Paused,
}

/// Owns one [`ReminderClock`] per category and drives them as a unit.
///
/// ```text
/// Stopped -(start)-> Running -(pause)-> Paused -(start/resume)-> Running
/// Running | Paused -(stop)-> Stopped
/// ```
///
/// Every operation is a no-op when it does not apply to the current state.
pub struct ReminderScheduler {
    state: SchedulerState,
    configs: ReminderConfigSet,
    clocks: BTreeMap<ReminderCategory, ReminderClock>,
    triggers: TriggerSender,
}

impl ReminderScheduler {
    pub fn new(configs: ReminderConfigSet, triggers: TriggerSender) -> Self {
        let clocks = configs
            .iter()
            .map(|(category, config)| (category, ReminderClock::new(category, config)))
            .collect();

        Self {
            state: SchedulerState::Stopped,
            configs,
            clocks,
            triggers,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    pub fn configs(&self) -> &ReminderConfigSet {
        &self.configs
    }

    pub fn timer(&self, category: ReminderCategory) -> &ReminderClock {
        &self.clocks[&category]
    }

    pub fn clock_statuses(&self) -> Vec<ClockStatus> {
        self.clocks.values().map(ReminderClock::status).collect()
    }

    /// Stored configs are applied on the next start from `Stopped` or on reset.
    /// Idle clocks of a stopped scheduler pick them up right away.
    pub fn update_configs(&mut self, configs: ReminderConfigSet) {
        log::info!("Reminder configs updated, applying on next restart. [state = {:?}]", self.state);
        self.configs = configs;

        if self.state == SchedulerState::Stopped {
            for (category, config) in self.configs.iter() {
                if let Some(clock) = self.clocks.get_mut(&category) {
                    clock.configure(config);
                }
            }
        }
    }

    pub fn start(&mut self) {
        match self.state {
            SchedulerState::Stopped => {
                for (category, config) in self.configs.iter() {
                    if let Some(clock) = self.clocks.get_mut(&category) {
                        clock.start(config);
                    }
                }
                log::info!("[START] Reminder clocks started.");
            }
            SchedulerState::Paused => {
                self.clocks.values_mut().for_each(ReminderClock::resume);
                log::info!("[RESUME] Reminder clocks resumed.");
            }
            SchedulerState::Running => {
                log::debug!("Start ignored, scheduler is already running.");
                return;
            }
        }

        self.state = SchedulerState::Running;
    }

    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.start();
        } else {
            log::debug!("Resume ignored. [state = {:?}]", self.state);
        }
    }

    pub fn pause(&mut self) {
        if self.state != SchedulerState::Running {
            log::debug!("Pause ignored. [state = {:?}]", self.state);
            return;
        }

        self.clocks.values_mut().for_each(ReminderClock::pause);
        self.state = SchedulerState::Paused;
        log::info!("[PAUSE] Reminder clocks paused.");
    }

    pub fn stop(&mut self) {
        self.clocks.values_mut().for_each(ReminderClock::stop);
        if self.state != SchedulerState::Stopped {
            log::info!("[STOP] Reminder clocks stopped. [previous_state = {:?}]", self.state);
        }
        self.state = SchedulerState::Stopped;
    }

    pub fn reset(&mut self) {
        self.stop();
        self.start();
    }

    /// Re-arms every clock from the stored configs without changing the state:
    /// a paused scheduler stays paused and a stopped one stays stopped.
    pub fn restart(&mut self) {
        match self.state {
            SchedulerState::Stopped => {
                log::debug!("Restart ignored, scheduler is stopped.");
            }
            SchedulerState::Running => self.reset(),
            SchedulerState::Paused => {
                self.reset();
                self.pause();
            }
        }
    }

    /// Advances every clock by one second, then forwards the elapsed ones in
    /// category order. Returns the forwarded events.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<TriggerEvent> {
        if self.state != SchedulerState::Running {
            return Vec::new();
        }

        let fired: Vec<TriggerEvent> = self
            .clocks
            .values_mut()
            .filter_map(|clock| clock.tick(now))
            .collect();

        for event in &fired {
            self.on_trigger(*event);
        }

        fired
    }

    fn on_trigger(&self, event: TriggerEvent) {
        log::info!(
            "[TRIGGER] Interval elapsed. [category = {}, next_in = {}]",
            event.category,
            self.timer(event.category).format_remaining()
        );
        self.triggers.send(event);
    }
}
