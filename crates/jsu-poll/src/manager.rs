use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::Result;
use crate::visibility::Visibility;

/// Shortest delay a resumed poll waits.
const MIN_DELAY: Duration = Duration::from_millis(1);

type Task = Box<dyn FnMut(Completion) + Send>;

/// Observable poller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Disabled,
    Idle,
    Scheduled,
    Running,
}

/// Periodic runner for a task that signals its own completion.
///
/// The interval is measured from the end of one run to the start of the next,
/// so a slow task delays the following run. Timers are only armed while the
/// surface is visible: hiding it clears the pending timer, showing it again
/// schedules the next run at `last_run + interval` (or right away when that
/// moment already passed).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use jsu_poll::{PageVisibility, PollingManager};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> jsu_poll::Result<()> {
/// let page = PageVisibility::default();
/// let poller = PollingManager::new(
///     |done| {
///         // fetch something, then:
///         done.done();
///     },
///     Duration::from_secs(10),
///     true,
///     page.subscribe(),
/// )?;
/// poller.disable();
/// # Ok(())
/// # }
/// ```
pub struct PollingManager {
    inner: Arc<Inner>,
    watcher: JoinHandle<()>,
}

impl PollingManager {
    /// Create a poller, armed immediately when `enabled`.
    ///
    /// Must be called within a tokio runtime; timers are spawned on it.
    pub fn new(
        task: impl FnMut(Completion) + Send + 'static,
        interval: Duration,
        enabled: bool,
        visibility: watch::Receiver<Visibility>,
    ) -> Result<Self> {
        let runtime = Handle::try_current()?;
        let inner = Arc::new(Inner {
            state: Mutex::new(State::default()),
            task: Mutex::new(Box::new(task)),
            interval,
            visibility: visibility.clone(),
            runtime: runtime.clone(),
        });
        let watcher = runtime.spawn(watch_visibility(Arc::downgrade(&inner), visibility));

        if enabled {
            inner.enable();
        }
        Ok(Self { inner, watcher })
    }

    pub fn enable(&self) { self.inner.enable(); }

    /// Stop scheduling runs. A run in progress is not interrupted.
    pub fn disable(&self) { self.inner.disable(); }

    /// Schedule the next run if enabled, visible and nothing is pending.
    pub fn resume(&self) { self.inner.resume(); }

    /// Run the task now, unless disabled or already running.
    pub fn run(&self) { self.inner.run(); }

    /// Clear the pending timer without touching `enabled`.
    pub fn cancel(&self) { self.inner.lock().cancel_timer(); }

    pub fn interval(&self) -> Duration { self.inner.interval }

    pub fn state(&self) -> PollState {
        let state = self.inner.lock();
        if state.running {
            PollState::Running
        } else if !state.enabled {
            PollState::Disabled
        } else if state.timer.is_some() {
            PollState::Scheduled
        } else {
            PollState::Idle
        }
    }
}

impl Drop for PollingManager {
    fn drop(&mut self) {
        self.watcher.abort();
        self.inner.lock().cancel_timer();
    }
}

/// Handed to each run; the task reports it finished through it.
///
/// Polling stalls until the completion is used.
#[must_use = "polling stalls until the completion is signalled"]
pub struct Completion {
    inner: Weak<Inner>,
    signalled: bool,
}

impl Completion {
    /// Finish the run and schedule the next one.
    pub fn done(self) { self.done_with(true); }

    /// Finish the run, scheduling the next one only when `schedule_next`.
    pub fn done_with(mut self, schedule_next: bool) {
        self.signalled = true;
        if let Some(inner) = self.inner.upgrade() {
            inner.complete(schedule_next);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.signalled && self.inner.strong_count() > 0 {
            warn!("poll task dropped its completion without signalling; polling is stalled");
        }
    }
}

struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    enabled: bool,
    running: bool,
    last_run: Option<Instant>,
    timer: Option<Timer>,
    generation: u64,
}

impl State {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
        }
    }
}

struct Inner {
    state: Mutex<State>,
    task: Mutex<Task>,
    interval: Duration,
    visibility: watch::Receiver<Visibility>,
    runtime: Handle,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> { self.state.lock().unwrap_or_else(PoisonError::into_inner) }

    fn is_visible(&self) -> bool { self.visibility.borrow().is_visible() }

    fn enable(self: &Arc<Self>) {
        let mut state = self.lock();
        if !state.enabled {
            state.enabled = true;
            self.resume_locked(&mut state);
        }
    }

    fn disable(&self) {
        let mut state = self.lock();
        if state.enabled {
            state.enabled = false;
            state.cancel_timer();
        }
    }

    fn resume(self: &Arc<Self>) {
        let mut state = self.lock();
        self.resume_locked(&mut state);
    }

    fn resume_locked(self: &Arc<Self>, state: &mut State) {
        let delay = match state.last_run {
            Some(last_run) => last_run
                .checked_add(self.interval)
                .map_or(Duration::MAX, |next| next.saturating_duration_since(Instant::now())),
            None => Duration::ZERO,
        };
        self.plan(state, delay.max(MIN_DELAY));
    }

    fn plan(self: &Arc<Self>, state: &mut State, delay: Duration) {
        if !state.enabled || state.timer.is_some() || !self.is_visible() {
            return;
        }
        state.generation += 1;
        let generation = state.generation;
        let inner = Arc::downgrade(self);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                inner.fire(generation);
            }
        });
        debug!(delay_ms = delay.as_millis() as u64, "poll scheduled");
        state.timer = Some(Timer { generation, handle });
    }

    fn fire(self: &Arc<Self>, generation: u64) {
        {
            let mut state = self.lock();
            // A replaced timer may still fire once.
            if state.timer.as_ref().map(|t| t.generation) != Some(generation) {
                return;
            }
            state.timer = None;
        }
        self.run();
    }

    fn run(self: &Arc<Self>) {
        {
            let mut state = self.lock();
            if !state.enabled || state.running {
                return;
            }
            state.running = true;
            state.cancel_timer();
        }

        debug!("poll task started");
        let completion = Completion {
            inner: Arc::downgrade(self),
            signalled: false,
        };
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        (*task)(completion);
    }

    fn complete(self: &Arc<Self>, schedule_next: bool) {
        let mut state = self.lock();
        state.last_run = Some(Instant::now());
        state.running = false;
        debug!(schedule_next, "poll task finished");
        if schedule_next {
            self.resume_locked(&mut state);
        }
    }
}

async fn watch_visibility(inner: Weak<Inner>, mut visibility: watch::Receiver<Visibility>) {
    while visibility.changed().await.is_ok() {
        let current = *visibility.borrow_and_update();
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if current.is_visible() {
            inner.resume();
        } else {
            inner.lock().cancel_timer();
        }
    }
}
