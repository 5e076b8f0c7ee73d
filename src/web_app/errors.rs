// web_app/errors.rs - User-facing error messages
//
// Every variant is recoverable: the manager keeps its previous data, stores
// the error for display, and carries on. Display is the message itself.

use thiserror::Error;

pub const VALIDATION_FAILED: &str = "Failed to validate the search query";
pub const QUERY_ALREADY_EXISTS: &str = "This query is already in the search history";
pub const SUBMISSION_FAILED: &str = "Failed to start the search";
pub const HISTORY_FETCH_FAILED: &str = "Failed to load search history";
pub const RESULTS_FETCH_FAILED: &str = "Failed to load search results";
pub const DELETE_FAILED: &str = "Failed to delete the history entry";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Count estimate failed; the query text is kept
    #[error("{0}")]
    Validation(String),

    /// The backend already has this query
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Submission(String),

    /// History or results list failed to load; previous data is kept
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Delete(String),
}

impl ClientError {
    pub fn message(&self) -> &str {
        match self {
            ClientError::Validation(m)
            | ClientError::Conflict(m)
            | ClientError::Submission(m)
            | ClientError::Fetch(m)
            | ClientError::Delete(m) => m,
        }
    }
}
