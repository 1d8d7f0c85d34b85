// ── Screen DTOs ──
//
// Wire-adjacent types exchanged with the backend services. Field names
// follow the services' JSON (camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service-level-objective gauge values, one reading per poll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloMetrics {
    /// 95th-percentile end-to-end latency, milliseconds.
    pub p95_latency: f64,
    /// Messages currently parked across all dead-letter topics.
    pub dlt_count: u64,
    /// Error-budget burn rate over the trailing hour.
    pub slo_burn_rate_1h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: String,
    pub total: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
}

/// One page of orders plus position metadata, as the order API pages it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub content: Vec<Order>,
    pub page: usize,
    pub size: usize,
    pub total_elements: u64,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderCommand {
    pub customer_id: String,
    pub total: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
}

/// Acknowledgement returned when an order is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
}

/// Fault-injection probabilities for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaosRule {
    pub p_drop: f64,
    pub p_dup: f64,
    pub max_delay_ms: u64,
    pub p_corrupt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanaryConfig {
    pub enabled: bool,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub replayed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeReport {
    pub purged: u64,
}
