// web_app/api/mod.rs - API gateway for the search backend
//
// The state managers only talk to the backend through `ApiGateway`.
// `HttpGateway` is the real implementation; tests plug in fakes.
//
// The trait is `?Send` so the same code runs on a browser event loop,
// where futures are never sent across threads.

pub mod config;
pub mod http;

pub use config::ApiConfig;
pub use http::HttpGateway;

use async_trait::async_trait;
use thiserror::Error;

use crate::web_app::model::{FilterSet, HistoryPage, ResultsPage};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 409 on submit: the query is already known to the backend
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other non-2xx response; `message` is the body's `error` field
    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The backend's own error text, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Conflict(message) => Some(message),
            ApiError::Status { message, .. } => message.as_deref(),
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }
}

/// Request/response contract of the search backend
#[async_trait(?Send)]
pub trait ApiGateway {
    /// Estimate how many products a query would return
    async fn estimate_count(&self, query: &str) -> Result<u64, ApiError>;

    /// Start a scrape for the query; `Conflict` if it was already submitted
    async fn submit_query(&self, query_text: &str) -> Result<(), ApiError>;

    async fn list_history(&self, page: u32) -> Result<HistoryPage, ApiError>;

    async fn delete_history(&self, id: i64) -> Result<(), ApiError>;

    /// Fetch one page of results, sorted by `filters` in iteration order
    async fn fetch_results(
        &self,
        query_id: i64,
        page: u32,
        filters: &FilterSet,
    ) -> Result<ResultsPage, ApiError>;
}

#[async_trait(?Send)]
impl<G: ApiGateway + ?Sized> ApiGateway for std::rc::Rc<G> {
    async fn estimate_count(&self, query: &str) -> Result<u64, ApiError> {
        (**self).estimate_count(query).await
    }

    async fn submit_query(&self, query_text: &str) -> Result<(), ApiError> {
        (**self).submit_query(query_text).await
    }

    async fn list_history(&self, page: u32) -> Result<HistoryPage, ApiError> {
        (**self).list_history(page).await
    }

    async fn delete_history(&self, id: i64) -> Result<(), ApiError> {
        (**self).delete_history(id).await
    }

    async fn fetch_results(
        &self,
        query_id: i64,
        page: u32,
        filters: &FilterSet,
    ) -> Result<ResultsPage, ApiError> {
        (**self).fetch_results(query_id, page, filters).await
    }
}
