use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Scheduler task is no longer running")]
    SchedulerClosed,

    #[error("Presentation task is no longer running")]
    PresentationClosed,
}
