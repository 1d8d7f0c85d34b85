// ── Poll scheduler ──
//
// One background task per started Source, firing the supplied work on a
// fixed interval. The loop awaits the work inline, so two executions for
// the same source can never overlap; a tick that comes due while work is
// still running is skipped, not queued. Results are published through a
// watch channel that consumers subscribe to via `PollFeed`.

use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::batch::FetchResult;
use crate::error::{CoreError, ErrorKind};
use crate::feed::PollFeed;
use crate::source::Source;

/// The latest observable outcome of a source's polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState<T> {
    /// No tick has completed yet.
    Pending,
    /// The most recent tick fetched successfully.
    Ready {
        tick: u64,
        at: DateTime<Utc>,
        value: T,
    },
    /// The most recent tick failed. The schedule keeps running; the next
    /// tick retries unconditionally (polling is the retry mechanism).
    Failed {
        tick: u64,
        at: DateTime<Utc>,
        error: ErrorKind,
    },
}

impl<T> PollState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, PollState::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            PollState::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            PollState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Tick counter of the last completed tick, if any.
    pub fn tick(&self) -> Option<u64> {
        match self {
            PollState::Pending => None,
            PollState::Ready { tick, .. } | PollState::Failed { tick, .. } => Some(*tick),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Periodic single-flight executor for one [`Source`].
///
/// Lifecycle is `Idle → Running → Stopped`, with `Stopped` terminal: a
/// view that reactivates constructs a fresh scheduler. At most one
/// execution of the work is ever in flight; the first tick fires
/// immediately on [`start`](Self::start).
pub struct PollScheduler<T: Clone + Send + Sync + 'static> {
    source: Source,
    state: watch::Sender<PollState<T>>,
    cancel: CancellationToken,
    phase: Mutex<Phase>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone + Send + Sync + 'static> PollScheduler<T> {
    pub fn new(source: Source) -> Self {
        let (state, _) = watch::channel(PollState::Pending);
        Self {
            source,
            state,
            cancel: CancellationToken::new(),
            phase: Mutex::new(Phase::Idle),
            task: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Begin polling: the first tick fires immediately, then every
    /// `source.interval()`.
    ///
    /// Errors if already running or previously stopped. A disabled source
    /// starts successfully but spawns no task and never ticks.
    pub fn start<W, Fut>(&self, work: W) -> Result<(), CoreError>
    where
        W: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = FetchResult<T>> + Send + 'static,
    {
        {
            let mut phase = self.phase.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            match *phase {
                Phase::Idle => *phase = Phase::Running,
                Phase::Running => {
                    return Err(CoreError::SchedulerRunning {
                        key: self.source.key().to_owned(),
                    });
                }
                Phase::Stopped => {
                    return Err(CoreError::SchedulerStopped {
                        key: self.source.key().to_owned(),
                    });
                }
            }
        }

        if !self.source.is_enabled() {
            debug!(source = self.source.key(), "source disabled -- not polling");
            return Ok(());
        }

        let handle = tokio::spawn(poll_loop(
            self.source.clone(),
            work,
            self.state.clone(),
            self.cancel.clone(),
        ));
        *self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Cancel the schedule and wait for the task to wind down.
    ///
    /// Cooperative: a tick already in flight runs to completion, but its
    /// result is discarded; nothing is published after cancellation is
    /// observed. Idempotent; terminal.
    pub async fn stop(&self) {
        *self
            .phase
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Phase::Stopped;
        self.cancel.cancel();

        let handle = self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        debug!(source = self.source.key(), "poll schedule stopped");
    }

    pub fn is_running(&self) -> bool {
        *self
            .phase
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            == Phase::Running
    }

    /// Subscribe to poll outcomes. Lazy and restartable: any number of
    /// feeds may attach or detach at any time without affecting the
    /// schedule.
    pub fn subscribe(&self) -> PollFeed<T> {
        PollFeed::new(self.state.subscribe())
    }

    /// The most recent published state.
    pub fn latest(&self) -> PollState<T> {
        self.state.borrow().clone()
    }
}

/// The per-source polling loop.
///
/// Single-flight by construction: the loop body awaits `work()` before
/// asking the interval for another tick, and `MissedTickBehavior::Skip`
/// drops (rather than queues) any tick that came due in the meantime.
async fn poll_loop<T, W, Fut>(
    source: Source,
    mut work: W,
    state: watch::Sender<PollState<T>>,
    cancel: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
    W: FnMut() -> Fut + Send,
    Fut: Future<Output = FetchResult<T>> + Send,
{
    let mut interval = tokio::time::interval(source.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let outcome = work().await;

                // A stop() issued mid-tick lets the work finish but
                // suppresses its effect on shared state.
                if cancel.is_cancelled() {
                    debug!(source = source.key(), tick, "poll cancelled mid-tick; result discarded");
                    break;
                }

                let at = Utc::now();
                match outcome {
                    Ok(value) => {
                        state.send_modify(|s| *s = PollState::Ready { tick, at, value });
                    }
                    Err(error) => {
                        warn!(source = source.key(), tick, error = %error, "poll tick failed");
                        state.send_modify(|s| *s = PollState::Failed { tick, at, error });
                    }
                }
                tick += 1;
            }
        }
    }
}
