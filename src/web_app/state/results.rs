// web_app/state/results.rs - Results synchronization manager
//
// One manager per query id. It keeps a page of results, the sort filters
// that produced it, and the URL mirror of those filters in step.
//
// The state only changes when the backend answers: the filters shown are
// always the ones the current items were sorted by.

use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};

use crate::web_app::api::ApiGateway;
use crate::web_app::errors::{ClientError, RESULTS_FETCH_FAILED};
use crate::web_app::model::{FilterSet, ResultsPage, SortDirection, SortField};
use crate::web_app::state::filters::FilterPort;
use crate::web_app::state::guard::{RequestGuard, RequestOutcome};

#[derive(Debug)]
struct ResultsState {
    page: ResultsPage,
    error: Option<ClientError>,
    guard: RequestGuard,
}

pub struct ResultsManager<G, P> {
    query_id: i64,
    gateway: G,
    port: P,
    /// Filters read from the URL at construction
    seeded: FilterSet,
    loaded: Cell<bool>,
    state: RefCell<ResultsState>,
}

impl<G: ApiGateway, P: FilterPort> ResultsManager<G, P> {
    /// Bind a manager to `query_id`, seeding filters from the URL
    pub fn new(query_id: i64, gateway: G, port: P) -> Self {
        let seeded = port.read();
        debug!("Results for query {} seeded with {:?}", query_id, seeded);
        Self {
            query_id,
            gateway,
            port,
            state: RefCell::new(ResultsState {
                page: ResultsPage::empty(seeded.clone()),
                error: None,
                guard: RequestGuard::new(),
            }),
            seeded,
            loaded: Cell::new(false),
        }
    }

    pub fn query_id(&self) -> i64 {
        self.query_id
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The filters parsed from the URL when the manager was built
    pub fn seeded_filters(&self) -> &FilterSet {
        &self.seeded
    }

    pub fn page(&self) -> ResultsPage {
        self.state.borrow().page.clone()
    }

    pub fn filters(&self) -> FilterSet {
        self.state.borrow().page.filters.clone()
    }

    pub fn error(&self) -> Option<ClientError> {
        self.state.borrow().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
    }

    /// A fetch is in flight; sort and page controls should be disabled
    pub fn is_busy(&self) -> bool {
        self.state.borrow().guard.is_busy()
    }

    /// Initial fetch with the URL's filters; only the first dispatched call
    /// does anything
    pub async fn load(&self) -> RequestOutcome {
        if self.loaded.replace(true) {
            return RequestOutcome::Dropped;
        }
        let outcome = self.fetch(1, Some(self.seeded.clone())).await;
        if outcome == RequestOutcome::Dropped {
            // nothing was sent, a later load may still seed
            self.loaded.set(false);
        }
        outcome
    }

    /// Fetch a page with `filters`, or the current filters when `None`
    ///
    /// Dropped outright while another fetch is outstanding.
    pub async fn fetch(&self, page: u32, filters: Option<FilterSet>) -> RequestOutcome {
        let (ticket, filters) = {
            let mut state = self.state.borrow_mut();
            let Some(ticket) = state.guard.begin(false) else {
                debug!("Results fetch for page {} dropped, fetch in flight", page);
                return RequestOutcome::Dropped;
            };
            state.error = None;
            let filters = filters.unwrap_or_else(|| state.page.filters.clone());
            (ticket, filters)
        };

        debug!(
            "Fetching results for query {} page {} (request #{})",
            self.query_id,
            page,
            ticket.seq()
        );
        let result = self
            .gateway
            .fetch_results(self.query_id, page, &filters)
            .await;

        let mut state = self.state.borrow_mut();
        if !state.guard.finish(ticket) {
            debug!("Ignoring stale results page {}", page);
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(mut fresh) => {
                info!(
                    "Results page {}/{} loaded for query {} ({} items)",
                    fresh.current_page,
                    fresh.total_pages,
                    self.query_id,
                    fresh.items.len()
                );
                fresh.filters = filters;
                state.page = fresh;
                RequestOutcome::Applied
            }
            Err(e) => {
                warn!("Results for query {} failed to load: {}", self.query_id, e);
                let message = e.server_message().unwrap_or(RESULTS_FETCH_FAILED);
                state.error = Some(ClientError::Fetch(message.to_string()));
                RequestOutcome::Failed
            }
        }
    }

    /// Jump to another page with the current filters
    pub async fn change_page(&self, page: u32) -> RequestOutcome {
        let (current, total) = {
            let state = self.state.borrow();
            (state.page.current_page, state.page.total_pages)
        };
        if page < 1 || page > total || page == current {
            return RequestOutcome::Dropped;
        }
        self.fetch(page, None).await
    }

    /// Set or clear one field's direction and reload from page 1
    pub async fn update_single_filter(
        &self,
        field: SortField,
        direction: Option<SortDirection>,
    ) -> RequestOutcome {
        let filters = self.filters().with(field, direction);
        self.update_filters(filters).await
    }

    /// Replace every filter at once and reload from page 1
    ///
    /// While a fetch is in flight the whole update is dropped, URL included,
    /// so the URL never shows filters the results were not sorted by.
    pub async fn update_filters(&self, filters: FilterSet) -> RequestOutcome {
        if self.is_busy() {
            debug!("Filter update dropped, fetch in flight");
            return RequestOutcome::Dropped;
        }
        self.port.write(&filters);
        self.fetch(1, Some(filters)).await
    }

    /// Header click: unsorted -> asc -> desc -> unsorted for `field`
    pub async fn cycle_sort(&self, field: SortField) -> RequestOutcome {
        let next = SortDirection::cycle(self.filters().get(field));
        self.update_single_filter(field, next).await
    }
}
