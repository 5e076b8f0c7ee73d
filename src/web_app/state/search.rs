// web_app/state/search.rs - Query lifecycle manager
//
// Owns the query text, the validate -> confirm -> submit workflow and the
// paginated search history.
//
// State lives in a RefCell and every action takes `&self`, so one manager
// can be driven by several futures on a single-threaded executor. Borrows
// never live across an `.await`.

use std::cell::RefCell;

use tracing::{debug, info, warn};

use crate::web_app::api::{ApiError, ApiGateway};
use crate::web_app::errors::{
    ClientError, DELETE_FAILED, HISTORY_FETCH_FAILED, QUERY_ALREADY_EXISTS, SUBMISSION_FAILED,
    VALIDATION_FAILED,
};
use crate::web_app::model::{HistoryEntry, HistoryPage};
use crate::web_app::state::guard::{RequestGuard, RequestOutcome};

/// Where the query is in the validate/submit workflow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationState {
    #[default]
    Idle,
    /// Count estimate requested
    Validating,
    /// Backend estimated `total` results; waiting for the user to confirm
    Validated { total: u64 },
    /// Confirmed; the submit call is outstanding
    Submitting,
}

impl ValidationState {
    /// A validate or submit call is outstanding
    pub fn is_pending(self) -> bool {
        matches!(self, ValidationState::Validating | ValidationState::Submitting)
    }

    pub fn estimated_total(self) -> Option<u64> {
        match self {
            ValidationState::Validated { total } => Some(total),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    validation: ValidationState,
    history: HistoryPage,
    error: Option<ClientError>,
    workflow: RequestGuard,
    history_guard: RequestGuard,
    /// Page asked for by the latest history fetch
    requested_page: u32,
    pending_deletes: u32,
}

/// State manager behind the search page
pub struct SearchManager<G> {
    gateway: G,
    state: RefCell<SearchState>,
}

impl<G: ApiGateway> SearchManager<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: RefCell::new(SearchState::default()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn query(&self) -> String {
        self.state.borrow().query.clone()
    }

    pub fn validation(&self) -> ValidationState {
        self.state.borrow().validation
    }

    pub fn history(&self) -> HistoryPage {
        self.state.borrow().history.clone()
    }

    pub fn error(&self) -> Option<ClientError> {
        self.state.borrow().error.clone()
    }

    /// Anything outstanding: validate, submit, history fetch or delete
    pub fn is_loading(&self) -> bool {
        let state = self.state.borrow();
        state.validation.is_pending() || state.history_guard.is_busy() || state.pending_deletes > 0
    }

    /// A validate/submit call is in flight; new ones would be dropped
    pub fn is_busy(&self) -> bool {
        self.state.borrow().workflow.is_busy()
    }

    /// Replace the query text
    ///
    /// Resets validation and clears the error. An outstanding validate or
    /// submit keeps running, but its response will be ignored.
    pub fn edit(&self, text: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.query = text.into();
        state.validation = ValidationState::Idle;
        state.error = None;
        state.workflow.supersede();
    }

    /// Back to idle without contacting the backend
    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.validation = ValidationState::Idle;
        state.workflow.supersede();
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
    }

    /// Pick a history entry: its text becomes the query, and the entry is
    /// returned so the caller can open its results
    pub fn select(&self, id: i64) -> Option<HistoryEntry> {
        let entry = self
            .state
            .borrow()
            .history
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()?;
        self.edit(entry.query_text.clone());
        Some(entry)
    }

    /// `text` when non-blank, otherwise the current query; `None` if blank
    fn effective_text(&self, text: Option<&str>) -> Option<String> {
        let candidate = match text {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => self.state.borrow().query.clone(),
        };
        if candidate.trim().is_empty() {
            None
        } else {
            Some(candidate)
        }
    }

    /// Ask the backend how many results the query would produce
    pub async fn validate(&self, text: Option<&str>) -> RequestOutcome {
        let Some(query) = self.effective_text(text) else {
            return RequestOutcome::Dropped;
        };

        let ticket = {
            let mut state = self.state.borrow_mut();
            let Some(ticket) = state.workflow.begin(false) else {
                debug!("Validation of '{}' dropped, request in flight", query);
                return RequestOutcome::Dropped;
            };
            state.validation = ValidationState::Validating;
            state.error = None;
            ticket
        };

        debug!("Validating '{}' (request #{})", query, ticket.seq());
        let result = self.gateway.estimate_count(&query).await;

        let mut state = self.state.borrow_mut();
        if !state.workflow.finish(ticket) {
            debug!("Ignoring superseded validation of '{}'", query);
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(total) => {
                info!("Query '{}' validated: {} results", query, total);
                state.validation = ValidationState::Validated { total };
                RequestOutcome::Applied
            }
            Err(e) => {
                warn!("Validation of '{}' failed: {}", query, e);
                let message = e.server_message().unwrap_or(VALIDATION_FAILED);
                state.validation = ValidationState::Idle;
                state.error = Some(ClientError::Validation(message.to_string()));
                RequestOutcome::Failed
            }
        }
    }

    /// Submit the query for scraping
    ///
    /// On success the history jumps back to page 1 so the new entry shows,
    /// even if an edit or cancel superseded the submission meanwhile. A
    /// duplicate query surfaces the server's message and leaves history
    /// alone.
    pub async fn confirm(&self, text: Option<&str>) -> RequestOutcome {
        let Some(query) = self.effective_text(text) else {
            return RequestOutcome::Dropped;
        };

        let ticket = {
            let mut state = self.state.borrow_mut();
            let Some(ticket) = state.workflow.begin(false) else {
                debug!("Submission of '{}' dropped, request in flight", query);
                return RequestOutcome::Dropped;
            };
            state.validation = ValidationState::Submitting;
            state.error = None;
            ticket
        };

        debug!("Submitting '{}' (request #{})", query, ticket.seq());
        let result = self.gateway.submit_query(&query).await;

        let current = {
            let mut state = self.state.borrow_mut();
            let current = state.workflow.finish(ticket);
            if current {
                state.validation = ValidationState::Idle;
            }

            match result {
                Ok(()) => info!("Query '{}' submitted", query),
                Err(_) if !current => {
                    debug!("Ignoring superseded submission of '{}'", query);
                    return RequestOutcome::Superseded;
                }
                Err(ApiError::Conflict(message)) => {
                    warn!("Query '{}' already submitted", query);
                    let message = if message.trim().is_empty() {
                        QUERY_ALREADY_EXISTS.to_string()
                    } else {
                        message
                    };
                    state.error = Some(ClientError::Conflict(message));
                    return RequestOutcome::Failed;
                }
                Err(e) => {
                    warn!("Submission of '{}' failed: {}", query, e);
                    state.error = Some(ClientError::Submission(SUBMISSION_FAILED.to_string()));
                    return RequestOutcome::Failed;
                }
            }
            current
        };

        // The backend holds the new entry even when the user moved on
        self.fetch_history(Some(1), true).await;
        if current {
            RequestOutcome::Applied
        } else {
            RequestOutcome::Superseded
        }
    }

    /// Load a history page (current page when `None`)
    ///
    /// Dropped while another fetch is outstanding unless `force` is set;
    /// a forced fetch makes the earlier one stale.
    pub async fn fetch_history(&self, page: Option<u32>, force: bool) -> RequestOutcome {
        let (ticket, page) = {
            let mut state = self.state.borrow_mut();
            let page = page
                .filter(|p| *p >= 1)
                .unwrap_or(state.history.current_page);
            let Some(ticket) = state.history_guard.begin(force) else {
                debug!("History fetch for page {} dropped, fetch in flight", page);
                return RequestOutcome::Dropped;
            };
            state.error = None;
            state.requested_page = page;
            (ticket, page)
        };

        debug!("Fetching history page {} (request #{})", page, ticket.seq());
        let result = self.gateway.list_history(page).await;

        let mut state = self.state.borrow_mut();
        if !state.history_guard.finish(ticket) {
            debug!("Ignoring stale history page {}", page);
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(history) => {
                info!(
                    "History page {}/{} loaded ({} total)",
                    history.current_page, history.total_pages, history.total_count
                );
                state.history = history;
                RequestOutcome::Applied
            }
            Err(e) => {
                warn!("History page {} failed to load: {}", page, e);
                state.error = Some(ClientError::Fetch(HISTORY_FETCH_FAILED.to_string()));
                RequestOutcome::Failed
            }
        }
    }

    /// Reload the page currently shown
    pub async fn refresh_history(&self) -> RequestOutcome {
        self.fetch_history(None, true).await
    }

    /// Jump to another history page; out of range or same page is a no-op
    pub async fn change_page(&self, page: u32) -> RequestOutcome {
        let (current, total) = {
            let state = self.state.borrow();
            (state.history.current_page, state.history.total_pages)
        };
        if page < 1 || page > total || page == current {
            return RequestOutcome::Dropped;
        }
        self.fetch_history(Some(page), true).await
    }

    /// Delete a history entry, then reload history from the server
    ///
    /// When the entry was alone on a page past the first, the previous
    /// page is loaded instead of the now empty one. If another history
    /// fetch was issued while the delete was pending, the page that fetch
    /// asked for is reloaded instead.
    pub async fn remove(&self, id: i64) -> RequestOutcome {
        let (adjusted_page, history_seq) = {
            let mut state = self.state.borrow_mut();
            state.pending_deletes += 1;
            state.error = None;
            let history = &state.history;
            let page = if history.entries.len() == 1 && history.current_page > 1 {
                history.current_page - 1
            } else {
                history.current_page
            };
            (page, state.history_guard.latest())
        };

        debug!("Deleting history entry {}", id);
        let result = self.gateway.delete_history(id).await;

        let reload_page = {
            let mut state = self.state.borrow_mut();
            state.pending_deletes = state.pending_deletes.saturating_sub(1);
            if let Err(e) = result {
                warn!("Deleting history entry {} failed: {}", id, e);
                let message = e.server_message().unwrap_or(DELETE_FAILED);
                state.error = Some(ClientError::Delete(message.to_string()));
                return RequestOutcome::Failed;
            }
            if state.history_guard.latest() == history_seq {
                adjusted_page
            } else {
                debug!("History navigated during delete of {}", id);
                state.requested_page
            }
        };

        info!("History entry {} deleted, reloading page {}", id, reload_page);
        self.fetch_history(Some(reload_page), true).await;
        RequestOutcome::Applied
    }
}
