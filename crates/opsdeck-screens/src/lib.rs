// opsdeck-screens: screen-level view state for the chaos-symphony
// operations dashboard, built on the opsdeck-core polling engine.

pub mod api;
pub mod model;
pub mod screens;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{ChaosApi, DlqApi, MetricsApi, OrderApi};
pub use screens::chaos::ChaosScreen;
pub use screens::dlq::{DlqScreen, TopicBatch};
pub use screens::orders::OrdersScreen;
pub use screens::slo::SloScreen;
