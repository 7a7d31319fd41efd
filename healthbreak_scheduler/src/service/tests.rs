use healthbreak_models::{category::ReminderCategory, config::ReminderConfig};
use proptest::prelude::*;
use test_strategy::proptest;

use super::*;
use crate::{
    presentation::{DismissReason, cycle_channel},
    trigger::{TriggerReceiver, trigger_channel},
};

struct TestContext {
    service: SchedulerService,
    triggers: TriggerReceiver,
    cycles: mpsc::UnboundedSender<CycleCompleted>,
}

impl TestContext {
    fn new(configs: ReminderConfigSet) -> Self {
        let (trigger_tx, triggers) = trigger_channel();
        let (cycles, cycle_rx) = cycle_channel();
        let scheduler = ReminderScheduler::new(configs, trigger_tx);
        let service = SchedulerService::spawn(
            scheduler,
            cycle_rx,
            Duration::from_secs(1),
            &CancellationToken::new(),
        );

        Self {
            service,
            triggers,
            cycles,
        }
    }

    fn with_interval(category: ReminderCategory, interval: i64) -> Self {
        let configs = ReminderConfigSet::new(|_| ReminderConfig::disabled(interval))
            .with(category, ReminderConfig::new(true, interval, 20));
        Self::new(configs)
    }

    fn handle(&self) -> SchedulerHandle {
        self.service.handle()
    }

    fn received(&mut self) -> Vec<ReminderCategory> {
        let mut categories = Vec::new();
        while let Ok(event) = self.triggers.try_recv() {
            categories.push(event.category);
        }
        categories
    }

    async fn remaining(&self, category: ReminderCategory) -> u32 {
        let snapshot = self.handle().snapshot().await.unwrap();
        snapshot
            .clocks
            .iter()
            .find(|clock| clock.category == category)
            .map(|clock| clock.remaining_seconds)
            .unwrap()
    }
}

fn tokio_ct(
    future: impl std::future::Future<Output = Result<(), TestCaseError>>,
) -> Result<(), TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(future)
}

async fn wait_secs(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs) + Duration::from_millis(500)).await;
}

fn category_strategy() -> impl Strategy<Value = ReminderCategory> {
    prop_oneof![
        Just(ReminderCategory::Eyes),
        Just(ReminderCategory::Water),
        Just(ReminderCategory::Standup),
    ]
}

#[proptest(async = tokio_ct)]
async fn fires_once_per_elapsed_interval(
    #[strategy(category_strategy())] category: ReminderCategory,
    #[strategy(1i64..20)] interval: i64,
    #[strategy(1u64..4)] cycles: u64,
) {
    let mut ctx = TestContext::with_interval(category, interval);
    ctx.handle().start().await.unwrap();

    wait_secs(interval as u64 * cycles).await;

    let received = ctx.received();
    prop_assert_eq!(received.len() as u64, cycles);
    prop_assert!(received.iter().all(|c| *c == category));
    prop_assert_eq!(ctx.remaining(category).await, interval as u32);
}

#[proptest(async = tokio_ct)]
async fn never_fires_before_interval(
    #[strategy(category_strategy())] category: ReminderCategory,
    #[strategy(2i64..60)] interval: i64,
) {
    let mut ctx = TestContext::with_interval(category, interval);
    ctx.handle().start().await.unwrap();

    wait_secs(interval as u64 - 1).await;

    prop_assert!(ctx.received().is_empty());
    prop_assert_eq!(ctx.remaining(category).await, 1);
}

#[proptest(async = tokio_ct)]
async fn sleep_and_wake_keep_remaining_time(
    #[strategy(10i64..120)] interval: i64,
    #[strategy(1u64..9)] before_sleep: u64,
    #[strategy(1u64..10_000)] asleep: u64,
) {
    let mut ctx = TestContext::with_interval(ReminderCategory::Standup, interval);
    let handle = ctx.handle();
    handle.start().await.unwrap();
    wait_secs(before_sleep).await;

    handle.on_system_will_sleep().await.unwrap();
    let at_sleep = ctx.remaining(ReminderCategory::Standup).await;
    prop_assert!(handle.snapshot().await.unwrap().is_paused());

    wait_secs(asleep).await;
    handle.on_system_did_wake().await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    prop_assert!(snapshot.is_running());
    prop_assert_eq!(ctx.remaining(ReminderCategory::Standup).await, at_sleep);
    prop_assert_eq!(at_sleep as i64, interval - before_sleep as i64);
    prop_assert!(ctx.received().is_empty());
}

#[tokio::test(start_paused = true)]
async fn paused_scheduler_ignores_time() {
    let mut ctx = TestContext::with_interval(ReminderCategory::Water, 5);
    let handle = ctx.handle();

    handle.start().await.unwrap();
    wait_secs(3).await;
    handle.pause().await.unwrap();
    wait_secs(10).await;
    assert_eq!(ctx.remaining(ReminderCategory::Water).await, 2);

    handle.resume().await.unwrap();
    wait_secs(2).await;

    assert_eq!(ctx.received(), vec![ReminderCategory::Water]);
}

#[tokio::test(start_paused = true)]
async fn simultaneous_triggers_arrive_in_category_order() {
    let configs = ReminderConfigSet::new(|category| match category {
        ReminderCategory::Standup => ReminderConfig::new(true, 7, 20),
        _ => ReminderConfig::new(true, 5, 20),
    });
    let mut ctx = TestContext::new(configs);

    ctx.handle().start().await.unwrap();
    wait_secs(5).await;

    assert_eq!(
        ctx.received(),
        vec![ReminderCategory::Eyes, ReminderCategory::Water]
    );
}

#[tokio::test(start_paused = true)]
async fn stop_leaves_nothing_scheduled() {
    let mut ctx = TestContext::with_interval(ReminderCategory::Eyes, 3);
    let handle = ctx.handle();

    handle.start().await.unwrap();
    wait_secs(2).await;
    handle.stop().await.unwrap();
    wait_secs(30).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SchedulerState::Stopped);
    assert!(snapshot.clocks.iter().all(|clock| clock.remaining_seconds == 0));
    assert!(ctx.received().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reset_restarts_countdown() {
    let mut ctx = TestContext::with_interval(ReminderCategory::Eyes, 4);
    let handle = ctx.handle();

    handle.start().await.unwrap();
    wait_secs(3).await;
    handle.reset().await.unwrap();
    wait_secs(3).await;

    assert!(ctx.received().is_empty());
    assert_eq!(ctx.remaining(ReminderCategory::Eyes).await, 1);
}

#[tokio::test(start_paused = true)]
async fn updated_configs_apply_after_reset() {
    let ctx = TestContext::with_interval(ReminderCategory::Water, 10);
    let handle = ctx.handle();
    handle.start().await.unwrap();

    handle
        .update_configs(ReminderConfigSet::new(|_| ReminderConfig::new(true, 90, 20)))
        .await
        .unwrap();
    assert_eq!(ctx.remaining(ReminderCategory::Water).await, 10);

    handle.reset().await.unwrap();
    assert_eq!(ctx.remaining(ReminderCategory::Eyes).await, 90);
    assert_eq!(ctx.remaining(ReminderCategory::Water).await, 90);
}

#[tokio::test(start_paused = true)]
async fn restart_during_sleep_stays_paused_until_wake() {
    let mut ctx = TestContext::with_interval(ReminderCategory::Water, 10);
    let handle = ctx.handle();
    handle.start().await.unwrap();
    wait_secs(2).await;
    handle.on_system_will_sleep().await.unwrap();

    handle
        .update_configs(ReminderConfigSet::new(|_| ReminderConfig::new(true, 6, 20)))
        .await
        .unwrap();
    handle.restart().await.unwrap();
    wait_secs(60).await;

    assert!(handle.snapshot().await.unwrap().is_paused());
    assert_eq!(ctx.remaining(ReminderCategory::Water).await, 6);
    assert!(ctx.received().is_empty());

    handle.on_system_did_wake().await.unwrap();
    assert!(handle.snapshot().await.unwrap().is_running());
    wait_secs(6).await;
    assert_eq!(ctx.received(), ReminderCategory::ALL.to_vec());
}

#[tokio::test(start_paused = true)]
async fn completed_clock_cycles_are_counted() {
    let ctx = TestContext::with_interval(ReminderCategory::Eyes, 5);

    for (source, reason) in [
        (TriggerSource::Clock, DismissReason::Expired),
        (TriggerSource::Preview, DismissReason::User),
        (TriggerSource::Clock, DismissReason::User),
    ] {
        ctx.cycles
            .send(CycleCompleted {
                category: ReminderCategory::Eyes,
                source,
                reason,
            })
            .unwrap();
    }
    wait_secs(0).await;

    assert_eq!(ctx.handle().snapshot().await.unwrap().cycles_completed, 2);
}

#[tokio::test(start_paused = true)]
async fn replaced_or_shut_down_reminders_are_not_counted() {
    let ctx = TestContext::with_interval(ReminderCategory::Eyes, 5);

    for reason in [DismissReason::Replaced, DismissReason::Shutdown] {
        ctx.cycles
            .send(CycleCompleted {
                category: ReminderCategory::Eyes,
                source: TriggerSource::Clock,
                reason,
            })
            .unwrap();
    }
    wait_secs(0).await;

    assert_eq!(ctx.handle().snapshot().await.unwrap().cycles_completed, 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_closes_handles() {
    let ctx = TestContext::with_interval(ReminderCategory::Eyes, 5);
    let handle = ctx.handle();
    handle.start().await.unwrap();

    ctx.service.shutdown().await;

    assert_eq!(handle.start().await, Err(ServiceError::SchedulerClosed));
}
