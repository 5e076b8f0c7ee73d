// web_app/model/mod.rs - Shared data models for the search client
//
// Domain types used by the state managers, plus the wire shapes returned
// by the backend. Wire types convert into domain types via `From`, so the
// managers never see raw JSON field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sortable column of the results table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Name,
    Brand,
    Supplier,
    SupplierRating,
    ReviewRating,
    Feedbacks,
    Price,
}

impl SortField {
    /// Every field, in table column order
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::Brand,
        SortField::Supplier,
        SortField::SupplierRating,
        SortField::ReviewRating,
        SortField::Feedbacks,
        SortField::Price,
    ];

    /// Key used in the page URL query string
    pub fn url_key(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Brand => "brand",
            SortField::Supplier => "supplier",
            SortField::SupplierRating => "supplierRating",
            SortField::ReviewRating => "reviewRating",
            SortField::Feedbacks => "feedbacks",
            SortField::Price => "price",
        }
    }

    /// Query parameter understood by the results endpoint
    pub fn api_param(self) -> &'static str {
        match self {
            SortField::Name => "name_sort",
            SortField::Brand => "brand_sort",
            SortField::Supplier => "supplier_sort",
            SortField::SupplierRating => "supplier_rating_sort",
            SortField::ReviewRating => "review_rating_sort",
            SortField::Feedbacks => "feedbacks_sort",
            SortField::Price => "price_sort",
        }
    }

    pub fn from_url_key(key: &str) -> Option<SortField> {
        SortField::ALL.into_iter().find(|f| f.url_key() == key)
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url_key())
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::from_url_key(s).ok_or_else(|| format!("unknown sort field '{}'", s))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Lenient parse: `asc`/`desc` in any ASCII case, anything else is `None`
    pub fn parse(value: &str) -> Option<SortDirection> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    /// Next step of the header click cycle: unsorted → asc → desc → unsorted
    pub fn cycle(current: Option<SortDirection>) -> Option<SortDirection> {
        match current {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort directions per field, in insertion order
///
/// Iteration order is the compound sort order sent to the backend.
/// Re-setting a field keeps its slot; a new field goes to the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    entries: Vec<(SortField, SortDirection)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SortField) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, d)| *d)
    }

    pub fn set(&mut self, field: SortField, direction: SortDirection) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = direction,
            None => self.entries.push((field, direction)),
        }
    }

    pub fn remove(&mut self, field: SortField) -> Option<SortDirection> {
        let idx = self.entries.iter().position(|(f, _)| *f == field)?;
        Some(self.entries.remove(idx).1)
    }

    /// Set or clear a single field
    pub fn with(mut self, field: SortField, direction: Option<SortDirection>) -> Self {
        match direction {
            Some(d) => self.set(field, d),
            None => {
                self.remove(field);
            }
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (SortField, SortDirection)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(SortField, SortDirection)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (SortField, SortDirection)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (field, direction) in iter {
            set.set(field, direction);
        }
        set
    }
}

/// Previously submitted query as listed in the search history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub query_text: String,
    pub created_at: DateTime<Utc>,
    pub is_completed: bool,
    pub total_results: i64,
}

/// One page of search history
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_more: bool,
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            has_more: false,
        }
    }
}

/// A scraped product row; the client never edits these
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: i64,
    pub external_id: i64,
    pub name: String,
    pub brand: String,
    pub supplier: String,
    pub supplier_rating: f64,
    pub review_rating: f64,
    pub feedbacks: i64,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub search_query: i64,
}

/// The query a result set belongs to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    pub id: i64,
    pub query_text: String,
    pub is_completed: bool,
    pub total_results: i64,
    pub created_at: DateTime<Utc>,
}

/// One page of results together with the filters that produced it
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsPage {
    pub items: Vec<ResultItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub query_info: Option<QueryInfo>,
    pub filters: FilterSet,
}

impl ResultsPage {
    pub fn empty(filters: FilterSet) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            query_info: None,
            filters,
        }
    }
}

/// Paginated envelope shared by the history and results endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub results: Vec<T>,
}

/// Results endpoint body: a page plus the owning query
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultsResponse {
    #[serde(flatten)]
    pub page: Paginated<ResultItem>,
    pub search_query: QueryInfo,
}

/// Clamp backend page numbers so `1 <= current <= total` holds
pub fn normalize_pages(current: u32, total: u32) -> (u32, u32) {
    let total = total.max(1);
    (current.clamp(1, total), total)
}

impl From<Paginated<HistoryEntry>> for HistoryPage {
    fn from(wire: Paginated<HistoryEntry>) -> Self {
        let (current_page, total_pages) = normalize_pages(wire.current_page, wire.total_pages);
        HistoryPage {
            entries: wire.results,
            current_page,
            total_pages,
            total_count: wire.count,
            has_more: wire.next.is_some(),
        }
    }
}

impl ResultsResponse {
    /// Attach the filters the request was sent with
    pub fn into_page(self, filters: FilterSet) -> ResultsPage {
        let (current_page, total_pages) =
            normalize_pages(self.page.current_page, self.page.total_pages);
        ResultsPage {
            items: self.page.results,
            current_page,
            total_pages,
            total_count: self.page.count,
            query_info: Some(self.search_query),
            filters,
        }
    }
}
