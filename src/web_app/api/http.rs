// web_app/api/http.rs - reqwest-backed implementation of `ApiGateway`
//
// Endpoint layout:
//   POST   {base}/search/validate_query/   {"query": ...}       -> {"total": n}
//   POST   {base}/search/                  {"query_text": ...}  -> 2xx | 409 {"error"}
//   GET    {base}/search/history/?page=n                        -> paginated entries
//   DELETE {base}/search/{id}/                                  -> 2xx | {"error"}
//   GET    {base}/products/result/?id=&page=&<field>_sort=      -> paginated products

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{ApiConfig, ApiError, ApiGateway};
use crate::web_app::errors::QUERY_ALREADY_EXISTS;
use crate::web_app::model::{
    FilterSet, HistoryEntry, HistoryPage, Paginated, ResultsPage, ResultsResponse,
};

#[derive(Serialize)]
struct ValidateRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    total: u64,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    query_text: &'a str,
}

/// Error payload the backend attaches to failed responses
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Gateway that talks to the real backend over HTTP
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    config: ApiConfig,
}

impl HttpGateway {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = build_client(&config)?;
        debug!("HttpGateway targeting {}", config.base_url);
        Ok(Self { client, config })
    }

    /// Reuse an existing client, e.g. one shared with other services
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn request_history(&self, page: u32) -> Result<HistoryPage, ApiError> {
        let response = self
            .client
            .get(self.config.endpoint("/search/history/"))
            .query(&[("page", page)])
            .send()
            .await?;
        let body: Paginated<HistoryEntry> = ensure_success(response).await?.json().await?;
        Ok(body.into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &ApiConfig) -> Result<Client, ApiError> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(ApiError::from)
}

#[cfg(target_arch = "wasm32")]
fn build_client(_config: &ApiConfig) -> Result<Client, ApiError> {
    Ok(Client::new())
}

/// Turn a non-2xx response into `ApiError::Status`, keeping the server's message
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response).await;
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

/// Query parameters for the results endpoint, sort params in filter order
pub fn results_params(query_id: i64, page: u32, filters: &FilterSet) -> Vec<(&'static str, String)> {
    let mut params = vec![("id", query_id.to_string()), ("page", page.to_string())];
    params.extend(
        filters
            .iter()
            .map(|(field, direction)| (field.api_param(), direction.as_str().to_string())),
    );
    params
}

#[async_trait(?Send)]
impl ApiGateway for HttpGateway {
    async fn estimate_count(&self, query: &str) -> Result<u64, ApiError> {
        debug!("Estimating result count for '{}'", query);
        let response = self
            .client
            .post(self.config.endpoint("/search/validate_query/"))
            .json(&ValidateRequest { query })
            .send()
            .await?;
        let body: ValidateResponse = ensure_success(response).await?.json().await?;
        info!("Query '{}' would return {} results", query, body.total);
        Ok(body.total)
    }

    async fn submit_query(&self, query_text: &str) -> Result<(), ApiError> {
        debug!("Submitting query '{}'", query_text);
        let response = self
            .client
            .post(self.config.endpoint("/search/"))
            .json(&SubmitRequest { query_text })
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            let message = error_message(response)
                .await
                .unwrap_or_else(|| QUERY_ALREADY_EXISTS.to_string());
            warn!("Query '{}' rejected as duplicate", query_text);
            return Err(ApiError::Conflict(message));
        }

        ensure_success(response).await?;
        info!("Query '{}' accepted", query_text);
        Ok(())
    }

    /// Listing failures degrade to an empty first page instead of an error
    async fn list_history(&self, page: u32) -> Result<HistoryPage, ApiError> {
        match self.request_history(page).await {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!("History page {} unavailable, showing empty list: {}", page, e);
                Ok(HistoryPage::default())
            }
        }
    }

    async fn delete_history(&self, id: i64) -> Result<(), ApiError> {
        debug!("Deleting history entry {}", id);
        let response = self
            .client
            .delete(self.config.endpoint(&format!("/search/{}/", id)))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_results(
        &self,
        query_id: i64,
        page: u32,
        filters: &FilterSet,
    ) -> Result<ResultsPage, ApiError> {
        let params = results_params(query_id, page, filters);
        debug!("Fetching results with {:?}", params);
        let response = self
            .client
            .get(self.config.endpoint("/products/result/"))
            .query(&params)
            .send()
            .await?;
        let body: ResultsResponse = ensure_success(response).await?.json().await?;
        Ok(body.into_page(filters.clone()))
    }
}
