mod appsettings;
mod commands;
mod console;
mod power;

use std::sync::Arc;

use anyhow::Context;
use appsettings::AppSettings;
use commands::CommandConsole;
use console::ConsoleGateway;
use healthbreak_scheduler::{
    ReminderScheduler, SchedulerService,
    presentation::{DisplayOptions, PresentationDispatcher, cycle_channel},
    trigger_channel,
};
use healthbreak_storage::{JsonFileSettingsStore, SettingsStore};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let app_settings = AppSettings::new().context("Unable to load application settings")?;
    log::info!("Starting healthbreak with {app_settings:?}");

    let settings_store: Arc<dyn SettingsStore> = Arc::new(JsonFileSettingsStore::new(
        &app_settings.storage.settings_path,
    ));
    let health_settings = settings_store.load().await;
    let configs = health_settings.reminder_configs();
    let tick_period = app_settings.scheduler.tick_period();

    let cancellation_token = CancellationToken::new();
    let (trigger_tx, trigger_rx) = trigger_channel();
    let (cycle_tx, cycle_rx) = cycle_channel();

    let presentation = PresentationDispatcher::spawn(
        Arc::new(ConsoleGateway),
        DisplayOptions {
            configs: configs.clone(),
            force_focus_mode: health_settings.force_focus_mode,
        },
        (trigger_tx.clone(), trigger_rx),
        cycle_tx,
        tick_period,
        &cancellation_token,
    );
    let scheduler = SchedulerService::spawn(
        ReminderScheduler::new(configs, trigger_tx),
        cycle_rx,
        tick_period,
        &cancellation_token,
    );
    let power_monitor = power::spawn_power_monitor(scheduler.handle(), cancellation_token.clone())
        .context("Unable to register power monitor")?;

    if app_settings.scheduler.autostart {
        scheduler.handle().start().await?;
    }

    let console = CommandConsole::new(
        scheduler.handle(),
        presentation.handle(),
        Arc::clone(&settings_store),
    );

    let result = tokio::select! {
        result = console.run() => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, shutting down");
            Ok(())
        }
    };

    cancellation_token.cancel();
    scheduler.shutdown().await;
    presentation.shutdown().await;
    let _ = power_monitor.await;

    result
}

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();
}
