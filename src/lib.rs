// lib.rs - Root module for the product_search_client library
//
// Client-side state for a product search service: query validation and
// submission, search history, and sortable paginated results.

/// The web_app module contains the model, API gateway and state managers
pub mod web_app;
