// web_app/state/mod.rs - Client-side state managers
//
// - guard.rs: in-flight guard with request sequence numbers
// - filters.rs: FilterSet <-> URL query string, FilterPort
// - search.rs: query lifecycle (validate/confirm) and search history
// - results.rs: results pagination, sorting and URL sync
// - pagination.rs: page-button window for pagination controls
//
// Managers never call each other; the page that owns them passes the
// selected query id from `SearchManager::select` into a `ResultsManager`.

pub mod filters;
pub mod guard;
pub mod pagination;
pub mod results;
pub mod search;

pub use filters::{FilterPort, MemoryFilterPort};
pub use guard::{RequestGuard, RequestOutcome, Ticket};
pub use pagination::{page_window, PageSlot};
pub use results::ResultsManager;
pub use search::{SearchManager, ValidationState};
