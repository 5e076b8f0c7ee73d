// common/mod.rs - Shared test utilities for driving the state managers
//
// `FakeGateway` stands in for the backend:
// 1. Responses are scripted per operation and handed out in call order
// 2. Every call is recorded before it is answered
// 3. A gated fake parks each call until the test opens the gate, which
//    keeps a request in flight while a second action is attempted

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Semaphore;

use product_search_client::web_app::api::{ApiError, ApiGateway};
use product_search_client::web_app::model::{
    FilterSet, HistoryEntry, HistoryPage, ResultItem, ResultsPage,
};

/// Everything the managers asked the backend for, in order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Calls {
    pub estimates: Vec<String>,
    pub submissions: Vec<String>,
    pub history_pages: Vec<u32>,
    pub deletes: Vec<i64>,
    pub results: Vec<(i64, u32, FilterSet)>,
}

#[derive(Default)]
struct Script {
    estimates: VecDeque<Result<u64, ApiError>>,
    submissions: VecDeque<Result<(), ApiError>>,
    history: VecDeque<Result<HistoryPage, ApiError>>,
    deletes: VecDeque<Result<(), ApiError>>,
    results: VecDeque<Result<ResultsPage, ApiError>>,
}

pub struct FakeGateway {
    script: RefCell<Script>,
    calls: RefCell<Calls>,
    gate: Option<Semaphore>,
}

impl FakeGateway {
    /// Answers every call immediately
    pub fn new() -> Self {
        Self {
            script: RefCell::new(Script::default()),
            calls: RefCell::new(Calls::default()),
            gate: None,
        }
    }

    /// Holds every call until `open` releases it
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Let `n` parked (or future) calls through, in arrival order
    pub fn open(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.borrow().clone()
    }

    pub fn push_estimate(&self, response: Result<u64, ApiError>) {
        self.script.borrow_mut().estimates.push_back(response);
    }

    pub fn push_submission(&self, response: Result<(), ApiError>) {
        self.script.borrow_mut().submissions.push_back(response);
    }

    pub fn push_history(&self, response: Result<HistoryPage, ApiError>) {
        self.script.borrow_mut().history.push_back(response);
    }

    pub fn push_delete(&self, response: Result<(), ApiError>) {
        self.script.borrow_mut().deletes.push_back(response);
    }

    pub fn push_results(&self, response: Result<ResultsPage, ApiError>) {
        self.script.borrow_mut().results.push_back(response);
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
    }
}

fn unscripted<T>(what: &str) -> Result<T, ApiError> {
    Err(ApiError::Transport(format!("no scripted {} response", what)))
}

#[async_trait(?Send)]
impl ApiGateway for FakeGateway {
    async fn estimate_count(&self, query: &str) -> Result<u64, ApiError> {
        self.calls.borrow_mut().estimates.push(query.to_string());
        let response = self.script.borrow_mut().estimates.pop_front();
        self.pass_gate().await;
        response.unwrap_or_else(|| unscripted("estimate"))
    }

    async fn submit_query(&self, query_text: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().submissions.push(query_text.to_string());
        let response = self.script.borrow_mut().submissions.pop_front();
        self.pass_gate().await;
        response.unwrap_or_else(|| unscripted("submission"))
    }

    async fn list_history(&self, page: u32) -> Result<HistoryPage, ApiError> {
        self.calls.borrow_mut().history_pages.push(page);
        let response = self.script.borrow_mut().history.pop_front();
        self.pass_gate().await;
        response.unwrap_or_else(|| unscripted("history"))
    }

    async fn delete_history(&self, id: i64) -> Result<(), ApiError> {
        self.calls.borrow_mut().deletes.push(id);
        let response = self.script.borrow_mut().deletes.pop_front();
        self.pass_gate().await;
        response.unwrap_or_else(|| unscripted("delete"))
    }

    async fn fetch_results(
        &self,
        query_id: i64,
        page: u32,
        filters: &FilterSet,
    ) -> Result<ResultsPage, ApiError> {
        self.calls
            .borrow_mut()
            .results
            .push((query_id, page, filters.clone()));
        let response = self.script.borrow_mut().results.pop_front();
        self.pass_gate().await;
        response.unwrap_or_else(|| unscripted("results"))
    }
}

pub fn entry(id: i64, query_text: &str) -> HistoryEntry {
    HistoryEntry {
        id,
        query_text: query_text.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap(),
        is_completed: true,
        total_results: 42,
    }
}

/// History page with ten entries per full page, like the backend
pub fn history_page(current_page: u32, total_pages: u32, entries: Vec<HistoryEntry>) -> HistoryPage {
    HistoryPage {
        total_count: u64::from(total_pages.saturating_sub(1)) * 10 + entries.len() as u64,
        entries,
        current_page,
        total_pages,
        has_more: current_page < total_pages,
    }
}

pub fn item(id: i64, name: &str, price: i64) -> ResultItem {
    ResultItem {
        id,
        external_id: 100_000 + id,
        name: name.to_string(),
        brand: "Acme".to_string(),
        supplier: "Acme Store".to_string(),
        supplier_rating: 4.5,
        review_rating: 4.8,
        feedbacks: 120,
        price,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 0).unwrap(),
        search_query: 9,
    }
}

/// Results page as a gateway returns it; the manager attaches the filters
pub fn results_page(current_page: u32, total_pages: u32, items: Vec<ResultItem>) -> ResultsPage {
    ResultsPage {
        total_count: u64::from(total_pages.saturating_sub(1)) * 10 + items.len() as u64,
        items,
        current_page,
        total_pages,
        query_info: None,
        filters: FilterSet::new(),
    }
}
