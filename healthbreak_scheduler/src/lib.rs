mod clock;
mod error;
mod power;
pub mod presentation;
mod scheduler;
mod service;
mod trigger;

pub use clock::{ClockPhase, ClockStatus, ReminderClock};
pub use error::ServiceError;
pub use power::{PowerEvent, SleepWakeCoordinator};
pub use scheduler::{ReminderScheduler, SchedulerState};
pub use service::{SchedulerHandle, SchedulerService, SchedulerSnapshot};
pub use trigger::{TriggerEvent, TriggerReceiver, TriggerSender, TriggerSource, trigger_channel};
