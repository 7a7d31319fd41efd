use healthbreak_scheduler::SchedulerHandle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Maps `SIGUSR1`/`SIGUSR2` to sleep/wake notifications, so a system sleep
/// hook can freeze the reminders with `kill -USR1 <pid>` before suspending
/// and `kill -USR2 <pid>` after resuming.
#[cfg(unix)]
pub fn spawn_power_monitor(
    scheduler: SchedulerHandle,
    cancellation_token: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut will_sleep = signal(SignalKind::user_defined1())?;
    let mut did_wake = signal(SignalKind::user_defined2())?;

    Ok(tokio::spawn(async move {
        loop {
            let result = tokio::select! {
                _ = cancellation_token.cancelled() => break,
                Some(()) = will_sleep.recv() => scheduler.on_system_will_sleep().await,
                Some(()) = did_wake.recv() => scheduler.on_system_did_wake().await,
                else => break,
            };

            if let Err(e) = result {
                log::warn!("Power monitor stopping: {e}");
                break;
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_power_monitor(
    _scheduler: SchedulerHandle,
    _cancellation_token: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    log::info!("No power monitor on this platform, reminders keep counting across sleep");
    Ok(tokio::spawn(async {}))
}
