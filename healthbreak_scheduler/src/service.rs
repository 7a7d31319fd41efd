use std::time::Duration;

use chrono::Utc;
use healthbreak_models::config::ReminderConfigSet;
use tokio::{
    sync::{mpsc, oneshot},
    task::{self, JoinHandle},
    time::{Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::ClockStatus,
    error::ServiceError,
    power::{PowerEvent, SleepWakeCoordinator},
    presentation::{CycleCompleted, CycleReceiver},
    scheduler::{ReminderScheduler, SchedulerState},
    trigger::TriggerSource,
};

#[derive(Debug)]
enum SchedulerCommand {
    Start,
    Pause,
    Resume,
    Stop,
    Reset,
    Restart,
    UpdateConfigs(ReminderConfigSet),
    Power(PowerEvent),
    Snapshot(oneshot::Sender<SchedulerSnapshot>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSnapshot {
    pub state: SchedulerState,
    pub clocks: Vec<ClockStatus>,
    pub cycles_completed: u64,
}

impl SchedulerSnapshot {
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }
}

/// Cloneable access to the scheduler task. Every collaborator that needs the
/// scheduler gets one of these; the scheduler itself is never shared.
#[derive(Clone)]
pub struct SchedulerHandle(mpsc::Sender<SchedulerCommand>);

impl SchedulerHandle {
    pub async fn start(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Start).await
    }

    pub async fn pause(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Resume).await
    }

    pub async fn stop(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Stop).await
    }

    pub async fn reset(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Reset).await
    }

    /// Applies the stored configs to a started scheduler and keeps it running or paused.
    pub async fn restart(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Restart).await
    }

    pub async fn update_configs(&self, configs: ReminderConfigSet) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::UpdateConfigs(configs)).await
    }

    pub async fn on_system_will_sleep(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Power(PowerEvent::WillSleep))
            .await
    }

    pub async fn on_system_did_wake(&self) -> Result<(), ServiceError> {
        self.send(SchedulerCommand::Power(PowerEvent::DidWake)).await
    }

    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(SchedulerCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| ServiceError::SchedulerClosed)
    }

    async fn send(&self, command: SchedulerCommand) -> Result<(), ServiceError> {
        self.0
            .send(command)
            .await
            .map_err(|_| ServiceError::SchedulerClosed)
    }
}

/// Task that owns the [`ReminderScheduler`] and its one-second tick.
///
/// Commands and ticks are handled one at a time on this task. The tick is
/// only polled while the scheduler is running, so a stopped or paused
/// scheduler has nothing scheduled.
pub struct SchedulerService {
    task: JoinHandle<()>,
    handle: SchedulerHandle,
    cancellation_token: CancellationToken,
}

impl SchedulerService {
    pub fn spawn(
        scheduler: ReminderScheduler,
        cycles: CycleReceiver,
        tick_period: Duration,
        cancellation_token: &CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let cancellation_token = cancellation_token.child_token();

        let service_loop = ServiceLoop {
            scheduler,
            coordinator: SleepWakeCoordinator::new(),
            cycles_completed: 0,
        };
        let task_cancellation_token = cancellation_token.clone();
        let task = task::spawn(async move {
            service_loop
                .run(rx, cycles, tick_period, task_cancellation_token)
                .await
        });

        Self {
            task,
            handle: SchedulerHandle(tx),
            cancellation_token,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.task.await {
            log::warn!("Scheduler task ended abnormally: {e}");
        }
    }
}

struct ServiceLoop {
    scheduler: ReminderScheduler,
    coordinator: SleepWakeCoordinator,
    cycles_completed: u64,
}

impl ServiceLoop {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SchedulerCommand>,
        mut cycles: CycleReceiver,
        tick_period: Duration,
        cancellation_token: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    self.scheduler.stop();
                    log::info!("Scheduler task shutting down");
                    break;
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle_command(command, &mut ticker);
                }
                Some(cycle) = cycles.recv() => self.on_cycle_completed(cycle),
                _ = ticker.tick(), if self.scheduler.is_running() => {
                    self.scheduler.tick(Utc::now());
                }
            }
        }
    }

    fn handle_command(&mut self, command: SchedulerCommand, ticker: &mut Interval) {
        let was_running = self.scheduler.is_running();
        let restarts = matches!(command, SchedulerCommand::Reset | SchedulerCommand::Restart);

        match command {
            SchedulerCommand::Start => self.scheduler.start(),
            SchedulerCommand::Pause => self.scheduler.pause(),
            SchedulerCommand::Resume => self.scheduler.resume(),
            SchedulerCommand::Stop => self.scheduler.stop(),
            SchedulerCommand::Reset => self.scheduler.reset(),
            SchedulerCommand::Restart => self.scheduler.restart(),
            SchedulerCommand::UpdateConfigs(configs) => self.scheduler.update_configs(configs),
            SchedulerCommand::Power(event) => self.coordinator.handle(event, &mut self.scheduler),
            SchedulerCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }

        // The next tick is a full period away whenever counting (re)starts.
        if self.scheduler.is_running() && (!was_running || restarts) {
            ticker.reset();
        }
    }

    fn on_cycle_completed(&mut self, cycle: CycleCompleted) {
        if cycle.source == TriggerSource::Clock && cycle.reason.completes_cycle() {
            self.cycles_completed += 1;
        }
        log::info!(
            "[CYCLE] Reminder cycle completed. [category = {}, source = {:?}, reason = {:?}]",
            cycle.category,
            cycle.source,
            cycle.reason
        );
    }

    fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            state: self.scheduler.state(),
            clocks: self.scheduler.clock_statuses(),
            cycles_completed: self.cycles_completed,
        }
    }
}

#[cfg(test)]
mod tests;
