// web_app/mod.rs - Root module of the search client
//
// Architecture:
// - model/: Domain types and backend wire shapes
// - api/: ApiGateway trait and its reqwest implementation
// - state/: Query lifecycle and results managers (framework independent)
// - errors.rs: User-facing error taxonomy
// - browser.rs: Leptos router binding for the URL filter mirror (hydrate only)

pub mod api;
pub mod errors;
pub mod model;
pub mod state;

#[cfg(feature = "hydrate")]
pub mod browser;

pub use api::{ApiConfig, ApiError, ApiGateway, HttpGateway};
pub use errors::ClientError;
pub use state::{ResultsManager, SearchManager};
