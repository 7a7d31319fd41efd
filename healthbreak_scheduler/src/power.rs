use crate::scheduler::ReminderScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    WillSleep,
    DidWake,
}

/// Freezes the reminder clocks across system suspension.
///
/// Only a scheduler that was running when the system went to sleep is resumed
/// on wake, and it continues from the remaining time it had.
#[derive(Debug, Default)]
pub struct SleepWakeCoordinator {
    was_running_before_sleep: bool,
}

impl SleepWakeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_running_before_sleep(&self) -> bool {
        self.was_running_before_sleep
    }

    pub fn handle(&mut self, event: PowerEvent, scheduler: &mut ReminderScheduler) {
        match event {
            PowerEvent::WillSleep => self.on_system_will_sleep(scheduler),
            PowerEvent::DidWake => self.on_system_did_wake(scheduler),
        }
    }

    pub fn on_system_will_sleep(&mut self, scheduler: &mut ReminderScheduler) {
        if scheduler.is_running() {
            self.was_running_before_sleep = true;
            scheduler.pause();
        }
        log::info!(
            "[SLEEP] System is going to sleep. [was_running = {}]",
            self.was_running_before_sleep
        );
    }

    pub fn on_system_did_wake(&mut self, scheduler: &mut ReminderScheduler) {
        log::info!(
            "[WAKE] System woke up. [was_running = {}]",
            self.was_running_before_sleep
        );
        if self.was_running_before_sleep {
            scheduler.resume();
        }
        self.was_running_before_sleep = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use healthbreak_models::{
        category::ReminderCategory,
        config::{ReminderConfig, ReminderConfigSet},
    };

    use super::*;
    use crate::{scheduler::SchedulerState, trigger::trigger_channel};

    fn scheduler() -> ReminderScheduler {
        let (tx, _rx) = trigger_channel();
        ReminderScheduler::new(
            ReminderConfigSet::new(|_| ReminderConfig::new(true, 30, 20)),
            tx,
        )
    }

    #[test]
    fn sleep_and_wake_preserve_remaining_time() {
        let mut scheduler = scheduler();
        let mut coordinator = SleepWakeCoordinator::new();
        scheduler.start();
        for _ in 0..12 {
            scheduler.tick(Utc::now());
        }
        let at_sleep = scheduler.timer(ReminderCategory::Water).remaining_seconds();

        coordinator.handle(PowerEvent::WillSleep, &mut scheduler);
        assert_eq!(scheduler.state(), SchedulerState::Paused);
        assert!(coordinator.was_running_before_sleep());

        coordinator.handle(PowerEvent::DidWake, &mut scheduler);
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert!(!coordinator.was_running_before_sleep());
        assert_eq!(
            scheduler.timer(ReminderCategory::Water).remaining_seconds(),
            at_sleep
        );
        assert_eq!(at_sleep, 18);
    }

    #[test]
    fn wake_does_not_start_a_stopped_scheduler() {
        let mut scheduler = scheduler();
        let mut coordinator = SleepWakeCoordinator::new();

        coordinator.on_system_will_sleep(&mut scheduler);
        coordinator.on_system_did_wake(&mut scheduler);

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }

    #[test]
    fn wake_does_not_resume_a_manual_pause() {
        let mut scheduler = scheduler();
        let mut coordinator = SleepWakeCoordinator::new();
        scheduler.start();
        scheduler.pause();

        coordinator.on_system_will_sleep(&mut scheduler);
        coordinator.on_system_did_wake(&mut scheduler);

        assert_eq!(scheduler.state(), SchedulerState::Paused);
    }

    #[test]
    fn flag_does_not_survive_into_next_sleep_cycle() {
        let mut scheduler = scheduler();
        let mut coordinator = SleepWakeCoordinator::new();
        scheduler.start();

        coordinator.on_system_will_sleep(&mut scheduler);
        coordinator.on_system_did_wake(&mut scheduler);
        scheduler.pause();

        coordinator.on_system_will_sleep(&mut scheduler);
        coordinator.on_system_did_wake(&mut scheduler);

        assert_eq!(scheduler.state(), SchedulerState::Paused);
    }

    #[test]
    fn stop_during_sleep_is_not_undone_by_wake() {
        let mut scheduler = scheduler();
        let mut coordinator = SleepWakeCoordinator::new();
        scheduler.start();

        coordinator.on_system_will_sleep(&mut scheduler);
        scheduler.stop();
        coordinator.on_system_did_wake(&mut scheduler);

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(!coordinator.was_running_before_sleep());
    }
}
