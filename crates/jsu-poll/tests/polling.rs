//! Scheduling behaviour on a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use jsu_poll::{Completion, PageVisibility, PollError, PollState, PollingManager};
use tokio::time::{Instant, sleep};

const INTERVAL: Duration = Duration::from_millis(100);

fn ms(n: u64) -> Duration { Duration::from_millis(n) }

/// Start times of every run, relative to the test start.
#[derive(Clone)]
struct Runs {
    start: Instant,
    at: Arc<Mutex<Vec<Duration>>>,
}

impl Runs {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            at: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self) { self.at.lock().unwrap().push(self.start.elapsed()); }

    fn count(&self) -> usize { self.at.lock().unwrap().len() }

    fn offsets(&self) -> Vec<Duration> { self.at.lock().unwrap().clone() }
}

fn poller(runs: &Runs, enabled: bool, page: &PageVisibility, finish: fn(Completion)) -> PollingManager {
    let runs = runs.clone();
    PollingManager::new(
        move |done| {
            runs.record();
            finish(done);
        },
        INTERVAL,
        enabled,
        page.subscribe(),
    )
    .unwrap()
}

fn done(completion: Completion) { completion.done(); }

#[tokio::test(start_paused = true)]
async fn test_runs_near_zero_then_after_interval() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, done);

    sleep(ms(250)).await;

    let offsets = runs.offsets();
    assert_eq!(offsets.len(), 3);
    assert!(offsets[0] < ms(10));
    assert!(offsets[1] >= INTERVAL && offsets[1] < ms(115));
    assert!(offsets[2] >= ms(200) && offsets[2] < ms(230));
    assert_eq!(poller.state(), PollState::Scheduled);
}

#[tokio::test(start_paused = true)]
async fn test_disable_enable_within_interval_does_not_run_early() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, done);

    sleep(ms(50)).await;
    assert_eq!(runs.count(), 1);
    poller.disable();
    assert_eq!(poller.state(), PollState::Disabled);
    poller.enable();

    sleep(ms(40)).await;
    assert_eq!(runs.count(), 1);
    sleep(ms(20)).await;
    assert_eq!(runs.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_enable_after_interval_runs_immediately() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, done);

    sleep(ms(10)).await;
    poller.disable();
    sleep(ms(300)).await;
    assert_eq!(runs.count(), 1);

    poller.enable();
    sleep(ms(5)).await;
    assert_eq!(runs.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_done_without_schedule_stops_until_resumed() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, |completion| completion.done_with(false));

    sleep(ms(500)).await;
    assert_eq!(runs.count(), 1);
    assert_eq!(poller.state(), PollState::Idle);

    poller.resume();
    sleep(ms(5)).await;
    assert_eq!(runs.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_hidden_surface_pauses_and_catches_up() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, done);

    sleep(ms(10)).await;
    page.set_hidden();
    sleep(ms(300)).await;
    assert_eq!(runs.count(), 1);
    assert_eq!(poller.state(), PollState::Idle);

    page.set_visible();
    sleep(ms(5)).await;
    assert_eq!(runs.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_short_hide_keeps_schedule() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let _poller = poller(&runs, true, &page, done);

    sleep(ms(10)).await;
    page.set_hidden();
    sleep(ms(20)).await;
    page.set_visible();

    sleep(ms(50)).await;
    assert_eq!(runs.count(), 1);
    sleep(ms(30)).await;
    assert_eq!(runs.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_starts_disabled() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, false, &page, done);

    sleep(ms(200)).await;
    assert_eq!(runs.count(), 0);
    assert_eq!(poller.state(), PollState::Disabled);

    poller.enable();
    sleep(ms(5)).await;
    assert_eq!(runs.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_interval_counts_from_completion() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let recorder = runs.clone();
    let _poller = PollingManager::new(
        move |completion| {
            recorder.record();
            tokio::spawn(async move {
                sleep(ms(30)).await;
                completion.done();
            });
        },
        INTERVAL,
        true,
        page.subscribe(),
    )
    .unwrap();

    sleep(ms(150)).await;

    let offsets = runs.offsets();
    assert_eq!(offsets.len(), 2);
    assert!(offsets[1] >= ms(130) && offsets[1] < ms(145));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_completion_stalls() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, drop);

    sleep(ms(500)).await;
    assert_eq!(runs.count(), 1);
    assert_eq!(poller.state(), PollState::Running);
}

#[tokio::test(start_paused = true)]
async fn test_run_is_ignored_while_running() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let pending: Arc<Mutex<Option<Completion>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&pending);
    let recorder = runs.clone();
    let poller = PollingManager::new(
        move |completion| {
            recorder.record();
            *slot.lock().unwrap() = Some(completion);
        },
        INTERVAL,
        true,
        page.subscribe(),
    )
    .unwrap();

    sleep(ms(10)).await;
    poller.run();
    assert_eq!(runs.count(), 1);

    let completion = pending.lock().unwrap().take().unwrap();
    completion.done();
    sleep(INTERVAL + ms(5)).await;
    assert_eq!(runs.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_polling() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let poller = poller(&runs, true, &page, done);

    sleep(ms(10)).await;
    drop(poller);
    sleep(ms(500)).await;
    assert_eq!(runs.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_interval_never_reruns() {
    let page = PageVisibility::default();
    let runs = Runs::new();
    let recorder = runs.clone();
    let poller = PollingManager::new(
        move |completion| {
            recorder.record();
            completion.done();
        },
        Duration::MAX,
        true,
        page.subscribe(),
    )
    .unwrap();

    sleep(ms(500)).await;
    assert_eq!(runs.count(), 1);
    assert_eq!(poller.state(), PollState::Scheduled);

    page.set_hidden();
    page.set_visible();
    sleep(ms(500)).await;
    assert_eq!(runs.count(), 1);
}

#[test]
fn test_new_requires_runtime() {
    let page = PageVisibility::default();
    let result = PollingManager::new(|done| done.done(), INTERVAL, true, page.subscribe());
    assert!(matches!(result, Err(PollError::NoRuntime(_))));
}
