// opsdeck-core: polling, fan-out aggregation, and view-state primitives
// for operations dashboards.

pub mod batch;
pub mod error;
pub mod feed;
pub mod paging;
pub mod reconcile;
pub mod scheduler;
pub mod source;
pub mod window;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::{AggregatedBatch, FetchResult, fan_out};
pub use error::{CoreError, ErrorKind};
pub use feed::{PollFeed, PollWatchStream};
pub use paging::{Page, PagedList};
pub use reconcile::{DetailTicket, Reconciliation, SelectionReconciler};
pub use scheduler::{PollScheduler, PollState};
pub use source::Source;
pub use window::{RollingWindow, Sample};
