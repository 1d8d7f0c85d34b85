// ── Core error types ──
//
// Consumers never see transport internals (HTTP statuses leak in only as
// the opaque `ServerError` payload a collaborator chose to report).
// `ErrorKind` classifies a single fetch failure; `CoreError` covers
// lifecycle and construction misuse.

use thiserror::Error;

/// Why a single fetch failed.
///
/// Produced by collaborator fetch capabilities and recorded per-entry in
/// an [`AggregatedBatch`](crate::batch::AggregatedBatch), where a failed entry
/// is a degraded row, never a batch-wide abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// No connection to the backend at all.
    #[error("backend unreachable")]
    TransportUnavailable,

    /// The resource or endpoint does not exist.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// The backend answered with a non-success status and a body.
    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Anything that did not classify (unparseable response, etc.).
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("rolling window capacity must be at least 1")]
    InvalidWindowCapacity,

    // Field is `key`, not `source`: thiserror would otherwise treat the
    // name as the error's source and demand `std::error::Error`.
    #[error("poll scheduler for source {key:?} is already running")]
    SchedulerRunning { key: String },

    #[error("poll scheduler for source {key:?} has been stopped")]
    SchedulerStopped { key: String },

    #[error(transparent)]
    Fetch(#[from] ErrorKind),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lifecycle_errors_name_the_source_key() {
        let running = CoreError::SchedulerRunning {
            key: "dlq-topics".to_owned(),
        };
        assert_eq!(
            running.to_string(),
            "poll scheduler for source \"dlq-topics\" is already running"
        );

        let stopped = CoreError::SchedulerStopped {
            key: "dlq-topics".to_owned(),
        };
        assert_eq!(
            stopped.to_string(),
            "poll scheduler for source \"dlq-topics\" has been stopped"
        );
    }
}
