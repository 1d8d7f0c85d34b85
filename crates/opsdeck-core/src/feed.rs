// ── Poll feeds ──
//
// Subscription types for consuming poll outcomes from a scheduler.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::scheduler::PollState;

/// A subscription to one source's poll outcomes.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct PollFeed<T: Clone + Send + Sync + 'static> {
    current: PollState<T>,
    receiver: watch::Receiver<PollState<T>>,
}

impl<T: Clone + Send + Sync + 'static> PollFeed<T> {
    pub(crate) fn new(receiver: watch::Receiver<PollState<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The state captured at creation time (or last `changed()`).
    pub fn current(&self) -> &PollState<T> {
        &self.current
    }

    /// The latest state (may have moved on since `current`).
    pub fn latest(&self) -> PollState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next tick outcome, returning the new state.
    /// Returns `None` once the scheduler has been dropped.
    pub async fn changed(&mut self) -> Option<PollState<T>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> PollWatchStream<T> {
        PollWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current state immediately, then one state per completed
/// tick, until the scheduler is dropped.
pub struct PollWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<PollState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for PollWatchStream<T> {
    type Item = PollState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin when the item type is Unpin, which
        // PollState always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
