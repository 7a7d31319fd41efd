use chrono::{DateTime, Utc};
use healthbreak_models::category::ReminderCategory;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Clock,
    Preview,
}

/// A completed interval (or a preview request) for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub category: ReminderCategory,
    pub timestamp: DateTime<Utc>,
    pub source: TriggerSource,
}

impl TriggerEvent {
    pub fn from_clock(category: ReminderCategory, timestamp: DateTime<Utc>) -> Self {
        Self {
            category,
            timestamp,
            source: TriggerSource::Clock,
        }
    }

    pub fn preview(category: ReminderCategory, timestamp: DateTime<Utc>) -> Self {
        Self {
            category,
            timestamp,
            source: TriggerSource::Preview,
        }
    }
}

pub type TriggerReceiver = mpsc::UnboundedReceiver<TriggerEvent>;

/// Fire-and-forget side of the trigger channel. Sending never blocks the
/// scheduler; events are delivered in the order they were sent.
#[derive(Clone, Debug)]
pub struct TriggerSender(mpsc::UnboundedSender<TriggerEvent>);

impl TriggerSender {
    pub fn new(inner: mpsc::UnboundedSender<TriggerEvent>) -> Self {
        TriggerSender(inner)
    }

    pub fn send(&self, event: TriggerEvent) {
        if self.0.send(event).is_err() {
            log::warn!(
                "Trigger receiver is gone, dropping event. [category = {}, source = {:?}]",
                event.category,
                event.source
            );
        }
    }
}

pub fn trigger_channel() -> (TriggerSender, TriggerReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TriggerSender::new(tx), rx)
}
