// ── Collaborator capabilities ──
//
// The REST clients the screens consume, reduced to the operations each
// screen needs. Transport, auth, and wire format live behind these
// traits; the screens only ever see typed results or an `ErrorKind`.
//
// Mutating operations are fire-once: they are never retried here, and a
// successful mutation is followed by the caller re-triggering a poll
// (the next scheduled tick), not automatically.

use std::future::Future;
use std::time::Duration;

use opsdeck_core::ErrorKind;

use crate::model::{
    CanaryConfig, ChaosRule, CreateOrderCommand, OrderPage, OrderReceipt, PurgeReport,
    ReplayReport, SloMetrics,
};

/// Dead-letter-queue administration endpoints.
pub trait DlqApi: Send + Sync + 'static {
    /// Names of all dead-letter topics.
    fn list_topics(&self) -> impl Future<Output = Result<Vec<String>, ErrorKind>> + Send;

    /// Number of messages currently parked on one topic.
    fn message_count(&self, topic: &str) -> impl Future<Output = Result<u64, ErrorKind>> + Send;

    /// Up to `limit` raw message payloads from the head of the topic,
    /// without consuming them.
    fn peek_messages(
        &self,
        topic: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>, ErrorKind>> + Send;

    /// Re-publish every parked message back to its original topic.
    fn replay_topic(
        &self,
        topic: &str,
    ) -> impl Future<Output = Result<ReplayReport, ErrorKind>> + Send;

    /// Permanently drain a topic.
    fn purge_topic(
        &self,
        topic: &str,
    ) -> impl Future<Output = Result<PurgeReport, ErrorKind>> + Send;
}

/// SLO metrics endpoint.
pub trait MetricsApi: Send + Sync + 'static {
    fn slo_metrics(&self) -> impl Future<Output = Result<SloMetrics, ErrorKind>> + Send;
}

/// Order browsing and submission endpoints.
pub trait OrderApi: Send + Sync + 'static {
    fn orders_page(
        &self,
        index: usize,
        size: usize,
    ) -> impl Future<Output = Result<OrderPage, ErrorKind>> + Send;

    fn submit_order(
        &self,
        command: CreateOrderCommand,
    ) -> impl Future<Output = Result<OrderReceipt, ErrorKind>> + Send;

    /// Rewind a consumer group by `window` so recent traffic is
    /// re-processed.
    fn replay_window(
        &self,
        consumer_group: &str,
        window: Duration,
    ) -> impl Future<Output = Result<(), ErrorKind>> + Send;
}

/// Fault-injection rule endpoints.
pub trait ChaosApi: Send + Sync + 'static {
    fn rules(
        &self,
    ) -> impl Future<Output = Result<std::collections::BTreeMap<String, ChaosRule>, ErrorKind>> + Send;

    fn put_rule(
        &self,
        topic: &str,
        rule: ChaosRule,
    ) -> impl Future<Output = Result<ChaosRule, ErrorKind>> + Send;

    fn delete_rule(&self, topic: &str) -> impl Future<Output = Result<(), ErrorKind>> + Send;

    fn clear_rules(&self) -> impl Future<Output = Result<(), ErrorKind>> + Send;

    fn canary(&self) -> impl Future<Output = Result<CanaryConfig, ErrorKind>> + Send;

    fn set_canary(
        &self,
        config: CanaryConfig,
    ) -> impl Future<Output = Result<CanaryConfig, ErrorKind>> + Send;
}
