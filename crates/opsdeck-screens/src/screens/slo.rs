// ── SLO trend screen ──
//
// Polls the aggregate SLO gauges and feeds three fixed-size rolling
// windows for trend display: p95 latency, dead-letter backlog, and
// 1-hour error-budget burn rate.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use opsdeck_core::{
    CoreError, FetchResult, PollFeed, PollScheduler, RollingWindow, Sample, Source,
};

use crate::api::MetricsApi;
use crate::model::SloMetrics;

/// Trend window length, one sample per poll tick.
pub const TREND_CAPACITY: usize = 30;

/// p95 latency objective, milliseconds.
pub const LATENCY_SLO_MS: f64 = 2_000.0;

/// Burn-rate objective: 1.0 burns the error budget exactly on schedule.
pub const BURN_RATE_SLO: f64 = 1.0;

pub struct SloScreen<C: MetricsApi> {
    inner: Arc<SloInner<C>>,
    scheduler: PollScheduler<SloMetrics>,
}

struct SloInner<C> {
    client: Arc<C>,
    trends: Mutex<Trends>,
}

struct Trends {
    latency: RollingWindow<f64>,
    dlt_count: RollingWindow<u64>,
    burn_rate: RollingWindow<f64>,
}

impl<C: MetricsApi> SloScreen<C> {
    pub fn new(client: C, interval: Duration) -> Result<Self, CoreError> {
        let trends = Trends {
            latency: RollingWindow::new(TREND_CAPACITY)?,
            dlt_count: RollingWindow::new(TREND_CAPACITY)?,
            burn_rate: RollingWindow::new(TREND_CAPACITY)?,
        };
        Ok(Self {
            inner: Arc::new(SloInner {
                client: Arc::new(client),
                trends: Mutex::new(trends),
            }),
            scheduler: PollScheduler::new(Source::new("slo-metrics", interval)),
        })
    }

    pub fn start(&self) -> Result<(), CoreError> {
        let inner = Arc::clone(&self.inner);
        self.scheduler.start(move || {
            let inner = Arc::clone(&inner);
            async move { inner.poll_once().await }
        })
    }

    pub async fn stop(&self) {
        self.scheduler.stop().await;
    }

    /// Subscribe to raw metric readings.
    pub fn metrics(&self) -> PollFeed<SloMetrics> {
        self.scheduler.subscribe()
    }

    pub fn latency_trend(&self) -> Vec<Sample<f64>> {
        self.inner.trends().latency.snapshot()
    }

    pub fn dlt_trend(&self) -> Vec<Sample<u64>> {
        self.inner.trends().dlt_count.snapshot()
    }

    pub fn burn_rate_trend(&self) -> Vec<Sample<f64>> {
        self.inner.trends().burn_rate.snapshot()
    }
}

impl<C: MetricsApi> SloInner<C> {
    fn trends(&self) -> std::sync::MutexGuard<'_, Trends> {
        self.trends.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One poll tick: fetch the gauges and, on success, append one
    /// sample to each trend window. A failed tick appends nothing --
    /// the trend lines simply pause until the next successful poll.
    async fn poll_once(&self) -> FetchResult<SloMetrics> {
        let metrics = self.client.slo_metrics().await?;

        let mut trends = self.trends();
        trends.latency.push(metrics.p95_latency);
        trends.dlt_count.push(metrics.dlt_count);
        trends.burn_rate.push(metrics.slo_burn_rate_1h);
        drop(trends);

        Ok(metrics)
    }
}
