use std::{str::FromStr, sync::Arc};

use anyhow::{Context, bail};
use healthbreak_models::{category::ReminderCategory, settings::HealthSettings};
use healthbreak_scheduler::{
    SchedulerHandle, SchedulerSnapshot, SchedulerState,
    presentation::{DismissOutcome, DisplayOptions, PresentationHandle},
};
use healthbreak_storage::SettingsStore;
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  start | pause | resume | stop | reset
  status
  dismiss
  preview <eyes|water|standup>
  enable <category> | disable <category>
  interval <category> <minutes>
  duration <category> <seconds>
  focus <on|off>
  help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Reset,
    Status,
    Dismiss,
    Preview(ReminderCategory),
    Enable(ReminderCategory),
    Disable(ReminderCategory),
    Interval(ReminderCategory, i64),
    Duration(ReminderCategory, i64),
    Focus(bool),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["start"] => Command::Start,
            ["pause"] => Command::Pause,
            ["resume"] => Command::Resume,
            ["stop"] => Command::Stop,
            ["reset"] => Command::Reset,
            ["status"] => Command::Status,
            ["dismiss"] => Command::Dismiss,
            ["preview", category] => Command::Preview(category.parse()?),
            ["enable", category] => Command::Enable(category.parse()?),
            ["disable", category] => Command::Disable(category.parse()?),
            ["interval", category, minutes] => Command::Interval(
                category.parse()?,
                minutes.parse().context("Interval must be a whole number of minutes")?,
            ),
            ["duration", category, seconds] => Command::Duration(
                category.parse()?,
                seconds.parse().context("Duration must be a whole number of seconds")?,
            ),
            ["focus", "on"] => Command::Focus(true),
            ["focus", "off"] => Command::Focus(false),
            ["help"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            _ => bail!("Unknown command '{}'", line.trim()),
        };

        Ok(command)
    }
}

/// Line-oriented control surface standing in for the menu bar and the
/// settings window.
pub struct CommandConsole {
    scheduler: SchedulerHandle,
    presentation: PresentationHandle,
    settings_store: Arc<dyn SettingsStore>,
}

impl CommandConsole {
    pub fn new(
        scheduler: SchedulerHandle,
        presentation: PresentationHandle,
        settings_store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            scheduler,
            presentation,
            settings_store,
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        println!("{HELP}");
        let mut lines = stdin_lines();

        while let Some(line) = lines.recv().await {
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    let output = self.execute(command).await?;
                    println!("{output}");
                }
                Err(e) => println!("{e:#}\n{HELP}"),
            }
        }

        Ok(())
    }

    pub async fn execute(&self, command: Command) -> anyhow::Result<String> {
        let output = match command {
            Command::Start => {
                self.scheduler.start().await?;
                self.status().await?
            }
            Command::Pause => {
                self.scheduler.pause().await?;
                self.status().await?
            }
            Command::Resume => {
                self.scheduler.resume().await?;
                self.status().await?
            }
            Command::Stop => {
                self.scheduler.stop().await?;
                self.status().await?
            }
            Command::Reset => {
                self.scheduler.reset().await?;
                self.status().await?
            }
            Command::Status => self.status().await?,
            Command::Dismiss => match self.presentation.dismiss().await? {
                DismissOutcome::Dismissed(category) => {
                    format!("Dismissed {} reminder.", category.display_name())
                }
                DismissOutcome::Refused { remaining_seconds } => {
                    format!("Focus mode is on, {remaining_seconds}s left.")
                }
                DismissOutcome::NothingShown => "No reminder is displayed.".to_owned(),
            },
            Command::Preview(category) => {
                self.presentation.preview(category);
                format!("Previewing {} reminder.", category.display_name())
            }
            Command::Enable(category) => {
                self.update_settings(|s| s.settings_for_mut(category).enabled = true)
                    .await?
            }
            Command::Disable(category) => {
                self.update_settings(|s| s.settings_for_mut(category).enabled = false)
                    .await?
            }
            Command::Interval(category, minutes) => {
                self.update_settings(|s| s.settings_for_mut(category).interval_minutes = minutes)
                    .await?
            }
            Command::Duration(category, seconds) => {
                self.update_settings(|s| s.settings_for_mut(category).duration_seconds = seconds)
                    .await?
            }
            Command::Focus(enabled) => {
                self.update_settings(|s| s.force_focus_mode = enabled).await?
            }
            Command::Help | Command::Quit => HELP.to_owned(),
        };

        Ok(output)
    }

    /// Saves the change, then re-arms the reminders so it takes effect. A
    /// paused or stopped scheduler keeps its state.
    async fn update_settings(
        &self,
        change: impl FnOnce(&mut HealthSettings),
    ) -> anyhow::Result<String> {
        let mut settings = self.settings_store.load().await;
        change(&mut settings);
        self.settings_store
            .save(&settings)
            .await
            .context("Unable to save settings")?;

        let configs = settings.reminder_configs();
        self.presentation
            .update_options(DisplayOptions {
                configs: configs.clone(),
                force_focus_mode: settings.force_focus_mode,
            })
            .await?;
        self.scheduler.update_configs(configs).await?;

        self.scheduler.restart().await?;

        Ok(format!("Settings saved.\n{}", self.status().await?))
    }

    async fn status(&self) -> anyhow::Result<String> {
        Ok(render_status(&self.scheduler.snapshot().await?))
    }
}

/// Reads stdin on a plain thread; a blocked read must not hold up runtime
/// shutdown.
fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn render_status(snapshot: &SchedulerSnapshot) -> String {
    let state = match snapshot.state {
        SchedulerState::Running => "running",
        SchedulerState::Paused => "paused",
        SchedulerState::Stopped => "stopped",
    };

    let mut lines = vec![format!("Reminders: {state}")];
    lines.extend(snapshot.clocks.iter().map(|clock| {
        let remaining = if clock.enabled {
            clock.formatted.as_str()
        } else {
            "off"
        };
        format!("  {:<9} {remaining}", clock.category.display_name())
    }));
    lines.push(format!("Completed breaks: {}", snapshot.cycles_completed));

    lines.join("\n")
}
