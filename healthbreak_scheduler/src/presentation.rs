//! Presentation side of a reminder cycle.
//!
//! Triggers reach the [`PresentationGateway`] through a dispatcher task that
//! owns the display-duration countdown of the reminder on screen. That
//! countdown is independent of the interval clocks: the clocks keep running
//! while a reminder is displayed.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use healthbreak_models::{category::ReminderCategory, config::ReminderConfigSet};
use tokio::{
    sync::{mpsc, oneshot},
    task::{self, JoinHandle},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::ServiceError,
    trigger::{TriggerEvent, TriggerReceiver, TriggerSender, TriggerSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Expired,
    User,
    Replaced,
    Shutdown,
}

impl DismissReason {
    /// Whether the reminder was seen through to the end, either by expiring or by the user.
    pub fn completes_cycle(self) -> bool {
        matches!(self, DismissReason::Expired | DismissReason::User)
    }
}

#[async_trait]
pub trait PresentationGateway: Send + Sync + 'static {
    async fn show_reminder(&self, reminder: &DisplayCountdown) -> anyhow::Result<()>;

    async fn dismiss_current(
        &self,
        category: ReminderCategory,
        reason: DismissReason,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub configs: ReminderConfigSet,
    pub force_focus_mode: bool,
}

impl DisplayOptions {
    fn display_seconds(&self, category: ReminderCategory) -> u32 {
        self.configs.get(category).display_duration_seconds()
    }
}

/// The reminder currently on screen and how long it stays there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCountdown {
    event: TriggerEvent,
    total_seconds: u32,
    remaining_seconds: u32,
    force_focus: bool,
}

impl DisplayCountdown {
    pub fn new(event: TriggerEvent, total_seconds: u32, force_focus: bool) -> Self {
        let total_seconds = total_seconds.max(1);
        Self {
            event,
            total_seconds,
            remaining_seconds: total_seconds,
            force_focus,
        }
    }

    pub fn event(&self) -> &TriggerEvent {
        &self.event
    }

    pub fn category(&self) -> ReminderCategory {
        self.event.category
    }

    pub fn is_preview(&self) -> bool {
        self.event.source == TriggerSource::Preview
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Returns `true` once the display duration is used up.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    pub fn can_dismiss(&self) -> bool {
        !self.force_focus || self.remaining_seconds == 0
    }

    pub fn progress(&self) -> f64 {
        f64::from(self.remaining_seconds) / f64::from(self.total_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    Dismissed(ReminderCategory),
    Refused { remaining_seconds: u32 },
    NothingShown,
}

/// Reported to the scheduler service whenever a displayed reminder goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleCompleted {
    pub category: ReminderCategory,
    pub source: TriggerSource,
    pub reason: DismissReason,
}

pub type CycleSender = mpsc::UnboundedSender<CycleCompleted>;
pub type CycleReceiver = mpsc::UnboundedReceiver<CycleCompleted>;

pub fn cycle_channel() -> (CycleSender, CycleReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Debug)]
enum PresentationCommand {
    Dismiss(oneshot::Sender<DismissOutcome>),
    UpdateOptions(DisplayOptions, oneshot::Sender<()>),
    Current(oneshot::Sender<Option<DisplayCountdown>>),
}

#[derive(Clone)]
pub struct PresentationHandle {
    commands: mpsc::Sender<PresentationCommand>,
    triggers: TriggerSender,
}

impl PresentationHandle {
    /// Shows a reminder for `category` without any clock elapsing.
    pub fn preview(&self, category: ReminderCategory) {
        log::info!("[PREVIEW] Showing preview reminder. [category = {category}]");
        self.triggers.send(TriggerEvent::preview(category, Utc::now()));
    }

    pub async fn dismiss(&self) -> Result<DismissOutcome, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(PresentationCommand::Dismiss(tx)).await?;
        rx.await.map_err(|_| ServiceError::PresentationClosed)
    }

    /// Returns once the dispatcher has applied `options`; every reminder shown afterwards uses them.
    pub async fn update_options(&self, options: DisplayOptions) -> Result<(), ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(PresentationCommand::UpdateOptions(options, tx)).await?;
        rx.await.map_err(|_| ServiceError::PresentationClosed)
    }

    pub async fn current(&self) -> Result<Option<DisplayCountdown>, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(PresentationCommand::Current(tx)).await?;
        rx.await.map_err(|_| ServiceError::PresentationClosed)
    }

    async fn send(&self, command: PresentationCommand) -> Result<(), ServiceError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ServiceError::PresentationClosed)
    }
}

pub struct PresentationDispatcher {
    task: JoinHandle<()>,
    handle: PresentationHandle,
    cancellation_token: CancellationToken,
}

impl PresentationDispatcher {
    pub fn spawn(
        gateway: Arc<dyn PresentationGateway>,
        options: DisplayOptions,
        triggers: (TriggerSender, TriggerReceiver),
        cycles: CycleSender,
        tick_period: Duration,
        cancellation_token: &CancellationToken,
    ) -> Self {
        let (trigger_tx, trigger_rx) = triggers;
        let (commands_tx, commands_rx) = mpsc::channel(64);
        let cancellation_token = cancellation_token.child_token();

        let dispatcher = Dispatcher {
            gateway,
            options,
            cycles,
            current: None,
        };
        let task_cancellation_token = cancellation_token.clone();
        let task = task::spawn(async move {
            dispatcher
                .run(trigger_rx, commands_rx, tick_period, task_cancellation_token)
                .await
        });

        Self {
            task,
            handle: PresentationHandle {
                commands: commands_tx,
                triggers: trigger_tx,
            },
            cancellation_token,
        }
    }

    pub fn handle(&self) -> PresentationHandle {
        self.handle.clone()
    }

    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.task.await {
            log::warn!("Presentation task ended abnormally: {e}");
        }
    }
}

struct Dispatcher {
    gateway: Arc<dyn PresentationGateway>,
    options: DisplayOptions,
    cycles: CycleSender,
    current: Option<DisplayCountdown>,
}

impl Dispatcher {
    async fn run(
        mut self,
        mut triggers: TriggerReceiver,
        mut commands: mpsc::Receiver<PresentationCommand>,
        tick_period: Duration,
        cancellation_token: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    self.finish(DismissReason::Shutdown).await;
                    log::info!("Presentation task shutting down");
                    break;
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle_command(command).await;
                }
                event = triggers.recv() => {
                    let Some(event) = event else { break };
                    self.show(event).await;
                    ticker.reset();
                }
                _ = ticker.tick(), if self.current.is_some() => {
                    let expired = self.current.as_mut().is_some_and(DisplayCountdown::tick);
                    if expired {
                        self.finish(DismissReason::Expired).await;
                    }
                }
            }
        }
    }

    async fn show(&mut self, event: TriggerEvent) {
        self.finish(DismissReason::Replaced).await;

        let countdown = DisplayCountdown::new(
            event,
            self.options.display_seconds(event.category),
            self.options.force_focus_mode,
        );
        log::info!(
            "[SHOW] Displaying reminder for {:?} seconds. [category = {}, source = {:?}]",
            countdown.total_seconds(),
            event.category,
            event.source
        );
        if let Err(e) = self.gateway.show_reminder(&countdown).await {
            log::warn!(
                "Presentation gateway failed to show reminder. [category = {}, error = {e:#}]",
                event.category
            );
        }
        self.current = Some(countdown);
    }

    async fn handle_command(&mut self, command: PresentationCommand) {
        match command {
            PresentationCommand::Dismiss(reply) => {
                let outcome = self.dismiss_by_user().await;
                let _ = reply.send(outcome);
            }
            PresentationCommand::UpdateOptions(options, reply) => {
                self.options = options;
                let _ = reply.send(());
            }
            PresentationCommand::Current(reply) => {
                let _ = reply.send(self.current.clone());
            }
        }
    }

    async fn dismiss_by_user(&mut self) -> DismissOutcome {
        let Some(current) = &self.current else {
            return DismissOutcome::NothingShown;
        };

        if !current.can_dismiss() {
            log::info!(
                "Dismiss refused, focus mode is on. [category = {}, remaining = {}]",
                current.category(),
                current.remaining_seconds()
            );
            return DismissOutcome::Refused {
                remaining_seconds: current.remaining_seconds(),
            };
        }

        let category = current.category();
        self.finish(DismissReason::User).await;
        DismissOutcome::Dismissed(category)
    }

    async fn finish(&mut self, reason: DismissReason) {
        let Some(current) = self.current.take() else {
            return;
        };

        let category = current.category();
        log::info!("[DISMISS] Reminder dismissed. [category = {category}, reason = {reason:?}]");
        if let Err(e) = self.gateway.dismiss_current(category, reason).await {
            log::warn!(
                "Presentation gateway failed to dismiss reminder. [category = {category}, error = {e:#}]"
            );
        }

        let _ = self.cycles.send(CycleCompleted {
            category,
            source: current.event().source,
            reason,
        });
    }
}
