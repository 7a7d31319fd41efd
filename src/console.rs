use async_trait::async_trait;
use healthbreak_models::category::ReminderCategory;
use healthbreak_scheduler::presentation::{DismissReason, DisplayCountdown, PresentationGateway};

/// Prints reminders to stdout in place of an on-screen overlay.
pub struct ConsoleGateway;

#[async_trait]
impl PresentationGateway for ConsoleGateway {
    async fn show_reminder(&self, reminder: &DisplayCountdown) -> anyhow::Result<()> {
        println!("{}", reminder_text(reminder));
        Ok(())
    }

    async fn dismiss_current(
        &self,
        category: ReminderCategory,
        reason: DismissReason,
    ) -> anyhow::Result<()> {
        if let Some(text) = dismiss_text(category, reason) {
            println!("{text}");
        }
        Ok(())
    }
}

fn reminder_text(reminder: &DisplayCountdown) -> String {
    let category = reminder.category();
    let preview = if reminder.is_preview() { " (preview)" } else { "" };
    let lock = if reminder.can_dismiss() {
        "Type `dismiss` to skip."
    } else {
        "Focus mode: wait for the countdown."
    };

    format!(
        "\n=== {}{preview} ===\n{}\n{}\nBreak for {}s. {lock}\n",
        category.title(),
        category.subtitle(),
        category.helper(),
        reminder.total_seconds(),
    )
}

fn dismiss_text(category: ReminderCategory, reason: DismissReason) -> Option<String> {
    match reason {
        DismissReason::Expired => Some(format!("{} break finished.", category.display_name())),
        DismissReason::User => Some(format!("{} break skipped.", category.display_name())),
        DismissReason::Replaced | DismissReason::Shutdown => None,
    }
}
