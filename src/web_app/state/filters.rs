// web_app/state/filters.rs - FilterSet <-> URL query string
//
// The results view mirrors its sort state in the page URL, e.g.
// `?price=desc&name=asc`. The URL is read once when a results manager is
// built and rewritten (replace, never push) whenever the filters change.

use std::cell::RefCell;
use std::rc::Rc;

use url::form_urlencoded;

use crate::web_app::model::{FilterSet, SortDirection, SortField};

/// Parse a query string into a FilterSet
///
/// Unknown keys and values other than `asc`/`desc` are ignored; for a
/// repeated key the first occurrence wins. A leading `?` is allowed.
pub fn parse_query(query: &str) -> FilterSet {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut filters = FilterSet::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Some(field) = SortField::from_url_key(&key) else {
            continue;
        };
        if filters.get(field).is_some() {
            continue;
        }
        if let Some(direction) = SortDirection::parse(&value) {
            filters.set(field, direction);
        }
    }
    filters
}

/// Render a FilterSet as a query string (no leading `?`)
pub fn to_query(filters: &FilterSet) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (field, direction) in filters.iter() {
        serializer.append_pair(field.url_key(), direction.as_str());
    }
    serializer.finish()
}

/// Read-once / write-many access to the URL's sort parameters
pub trait FilterPort {
    /// Current filters encoded in the URL
    fn read(&self) -> FilterSet;

    /// Replace the URL's filters without adding a navigation entry
    fn write(&self, filters: &FilterSet);
}

#[derive(Debug, Default)]
struct MemoryLocation {
    query: String,
    writes: usize,
}

/// In-memory URL used outside the browser
///
/// Clones share the same location, so a caller can keep a handle to
/// inspect what the manager wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryFilterPort {
    location: Rc<RefCell<MemoryLocation>>,
}

impl MemoryFilterPort {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            location: Rc::new(RefCell::new(MemoryLocation {
                query: query.into(),
                writes: 0,
            })),
        }
    }

    pub fn query_string(&self) -> String {
        self.location.borrow().query.clone()
    }

    /// Number of writes so far
    pub fn writes(&self) -> usize {
        self.location.borrow().writes
    }
}

impl FilterPort for MemoryFilterPort {
    fn read(&self) -> FilterSet {
        parse_query(&self.location.borrow().query)
    }

    fn write(&self, filters: &FilterSet) {
        let mut location = self.location.borrow_mut();
        location.query = to_query(filters);
        location.writes += 1;
    }
}
