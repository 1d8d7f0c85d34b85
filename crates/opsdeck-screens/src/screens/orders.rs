// ── Orders screen ──
//
// Polls one page of orders at a time. Page navigation is synchronous
// state only; the newly selected page is fetched on the next tick, the
// same way any other staleness is healed. Order submission keeps a short
// rolling window of receipts for display.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use opsdeck_core::{
    CoreError, ErrorKind, FetchResult, Page, PagedList, PollFeed, PollScheduler, RollingWindow,
    Source,
};

use crate::api::OrderApi;
use crate::model::{CreateOrderCommand, OrderPage, OrderReceipt};

/// Orders per page.
pub const PAGE_SIZE: usize = 20;

/// Receipts kept for the "recent orders" panel.
pub const RECENT_RECEIPTS: usize = 10;

/// Consumer group rewound by [`OrdersScreen::replay_recent`].
pub const REPLAY_CONSUMER_GROUP: &str = "orchestrator-order-created";

/// How far back a replay rewinds.
pub const REPLAY_WINDOW: Duration = Duration::from_secs(5 * 60);

pub struct OrdersScreen<C: OrderApi> {
    inner: Arc<OrdersInner<C>>,
    scheduler: PollScheduler<OrderPage>,
}

struct OrdersInner<C> {
    client: Arc<C>,
    paging: Mutex<PagedList>,
    receipts: Mutex<RollingWindow<OrderReceipt>>,
}

impl<C: OrderApi> OrdersScreen<C> {
    pub fn new(client: C, interval: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            inner: Arc::new(OrdersInner {
                client: Arc::new(client),
                paging: Mutex::new(PagedList::new(PAGE_SIZE)),
                receipts: Mutex::new(RollingWindow::new(RECENT_RECEIPTS)?),
            }),
            scheduler: PollScheduler::new(Source::new("orders-page", interval)),
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

    /// Subscribe to fetched order pages.
    pub fn orders(&self) -> PollFeed<OrderPage> {
        self.scheduler.subscribe()
    }

    /// Current page position.
    pub fn page(&self) -> Page {
        self.inner.paging().page()
    }

    /// Jump to a page; out-of-range targets leave the state unchanged.
    /// The page's content arrives with the next tick.
    pub fn go_to_page(&self, index: usize) -> Page {
        self.inner.paging().go_to(index)
    }

    pub fn next_page(&self) -> Page {
        self.inner.paging().next()
    }

    pub fn previous_page(&self) -> Page {
        self.inner.paging().previous()
    }

    /// Page numbers to render in the pagination control.
    pub fn visible_pages(&self, max_visible: usize) -> Vec<usize> {
        self.inner.paging().visible_window(max_visible)
    }

    /// Submit a new order. Fire-once: a failure surfaces to the caller
    /// and is never retried (submission is not idempotent).
    pub async fn submit_order(
        &self,
        command: CreateOrderCommand,
    ) -> Result<OrderReceipt, ErrorKind> {
        let receipt = self.inner.client.submit_order(command).await?;
        self.inner.receipts().push(receipt.clone());
        Ok(receipt)
    }

    /// Receipts of recent submissions, oldest first.
    pub fn recent_receipts(&self) -> Vec<OrderReceipt> {
        self.inner
            .receipts()
            .snapshot()
            .into_iter()
            .map(|sample| sample.value)
            .collect()
    }

    /// Rewind the orchestrator's consumer group by [`REPLAY_WINDOW`] so
    /// the last few minutes of traffic are re-processed. Fire-once.
    pub async fn replay_recent(&self) -> Result<(), ErrorKind> {
        self.inner
            .client
            .replay_window(REPLAY_CONSUMER_GROUP, REPLAY_WINDOW)
            .await
    }
}

impl<C: OrderApi> OrdersInner<C> {
    fn paging(&self) -> std::sync::MutexGuard<'_, PagedList> {
        self.paging.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn receipts(&self) -> std::sync::MutexGuard<'_, RollingWindow<OrderReceipt>> {
        self.receipts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One poll tick: fetch the page the operator is on and fold its
    /// totals back into the pagination state.
    async fn poll_once(&self) -> FetchResult<OrderPage> {
        let position = self.paging().page();
        let page = self
            .client
            .orders_page(position.index, position.size)
            .await?;
        self.paging().apply(page.total_elements, page.total_pages);
        Ok(page)
    }
}
