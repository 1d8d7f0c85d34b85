// ── DLQ browser screen ──
//
// Polls the dead-letter topic list, fans out one count fetch per topic,
// and keeps the operator's selected topic reconciled against each fresh
// batch. Selecting a topic loads its recent messages; if the topic
// drains away or is deleted, selection and messages are cleared.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use opsdeck_core::{
    AggregatedBatch, CoreError, DetailTicket, ErrorKind, FetchResult, PollFeed, PollScheduler,
    Reconciliation, SelectionReconciler, Source, fan_out,
};

use crate::api::DlqApi;
use crate::model::{PurgeReport, ReplayReport};

/// How many messages to peek per selected topic.
pub const MESSAGE_PEEK_LIMIT: usize = 20;

/// Per-topic state: the topic's parked-message count, or the failure
/// that stands in for it (rendered as an "unknown" row).
pub type TopicBatch = AggregatedBatch<String, u64>;

pub struct DlqScreen<C: DlqApi> {
    inner: Arc<DlqInner<C>>,
    scheduler: PollScheduler<TopicBatch>,
}

struct DlqInner<C> {
    client: Arc<C>,
    selection: Mutex<SelectionReconciler<String, u64>>,
    messages: watch::Sender<Arc<Vec<String>>>,
}

impl<C: DlqApi> DlqScreen<C> {
    pub fn new(client: C, interval: Duration) -> Self {
        let (messages, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(DlqInner {
                client: Arc::new(client),
                selection: Mutex::new(SelectionReconciler::new()),
                messages,
            }),
            scheduler: PollScheduler::new(Source::new("dlq-topics", interval)),
        }
    }

    /// Begin polling. The first topic batch is fetched immediately.
    pub fn start(&self) -> Result<(), CoreError> {
        let inner = Arc::clone(&self.inner);
        self.scheduler.start(move || {
            let inner = Arc::clone(&inner);
            async move { inner.poll_once().await }
        })
    }

    /// Stop polling and discard any in-flight batch.
    pub async fn stop(&self) {
        self.scheduler.stop().await;
    }

    /// Subscribe to topic batches.
    pub fn topics(&self) -> PollFeed<TopicBatch> {
        self.scheduler.subscribe()
    }

    /// Messages of the currently selected topic. Empty when nothing is
    /// selected or the selected topic vanished.
    pub fn messages(&self) -> watch::Receiver<Arc<Vec<String>>> {
        self.inner.messages.subscribe()
    }

    /// The selected topic and its last known count, if any.
    pub fn selected(&self) -> Option<(String, u64)> {
        self.inner
            .selection()
            .focused()
            .map(|(k, v)| (k.clone(), *v))
    }

    /// Select a topic for inspection and load its recent messages.
    ///
    /// The message load's failure is surfaced but does not disturb the
    /// selection itself; the next poll tick retries the refresh.
    pub async fn select(&self, topic: &str) -> Result<(), ErrorKind> {
        let count = self
            .scheduler
            .latest()
            .value()
            .and_then(|batch| batch.get(&topic.to_owned()).cloned())
            .and_then(Result::ok)
            .unwrap_or(0);

        let ticket = self.inner.selection().select(topic.to_owned(), count);
        self.inner.publish_messages(Vec::new());

        let messages = self
            .inner
            .client
            .peek_messages(topic, MESSAGE_PEEK_LIMIT)
            .await?;
        if self.inner.selection().admit(&ticket) {
            self.inner.publish_messages(messages);
        } else {
            debug!(topic, "selection moved before messages arrived; discarded");
        }
        Ok(())
    }

    /// Drop the selection and its messages.
    pub fn deselect(&self) {
        self.inner.selection().deselect();
        self.inner.publish_messages(Vec::new());
    }

    /// Replay every parked message of `topic` back to its origin.
    ///
    /// Fire-once: failures surface to the caller and are never retried
    /// here. On success the selection is cleared; the next tick shows
    /// the drained topic list.
    pub async fn replay(&self, topic: &str) -> Result<ReplayReport, ErrorKind> {
        let report = self.inner.client.replay_topic(topic).await?;
        self.deselect();
        Ok(report)
    }

    /// Permanently drain `topic`. Same fire-once semantics as replay.
    pub async fn purge(&self, topic: &str) -> Result<PurgeReport, ErrorKind> {
        let report = self.inner.client.purge_topic(topic).await?;
        self.deselect();
        Ok(report)
    }
}

impl<C: DlqApi> DlqInner<C> {
    fn selection(&self) -> std::sync::MutexGuard<'_, SelectionReconciler<String, u64>> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_messages(&self, messages: Vec<String>) {
        self.messages.send_modify(|m| *m = Arc::new(messages));
    }

    /// One poll tick: list topics, fan out the per-topic counts, then
    /// reconcile the selection against the fresh batch.
    async fn poll_once(self: Arc<Self>) -> FetchResult<TopicBatch> {
        let topics = self.client.list_topics().await?;

        let client = Arc::clone(&self.client);
        let batch = fan_out(topics, |topic| {
            let client = Arc::clone(&client);
            async move { client.message_count(&topic).await }
        })
        .await;

        let outcome = self.selection().on_batch(&batch);
        match outcome {
            Reconciliation::NoFocus => {}
            Reconciliation::Cleared => {
                debug!("selected topic vanished; clearing messages");
                self.publish_messages(Vec::new());
            }
            Reconciliation::Refreshed { ticket, .. } => {
                // Runs off the tick: a slow peek must not hold up batch
                // publication. admit() drops the result if focus moved.
                let inner = Arc::clone(&self);
                tokio::spawn(async move { inner.refresh_messages(ticket).await });
            }
        }
        Ok(batch)
    }

    /// Secondary fetch for the focused topic. Its failure degrades only
    /// the message panel, never the topic batch.
    async fn refresh_messages(&self, ticket: DetailTicket<String>) {
        match self
            .client
            .peek_messages(ticket.key(), MESSAGE_PEEK_LIMIT)
            .await
        {
            Ok(messages) => {
                if self.selection().admit(&ticket) {
                    self.publish_messages(messages);
                } else {
                    debug!(topic = %ticket.key(), "stale message refresh discarded");
                }
            }
            Err(error) => {
                debug!(topic = %ticket.key(), %error, "message refresh failed");
            }
        }
    }
}
