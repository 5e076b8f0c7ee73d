// tests/http_gateway_tests.rs - HttpGateway against a mock backend
//
// Checks request shapes and how error responses map onto ApiError.

use product_search_client::web_app::api::{ApiConfig, ApiError, ApiGateway, HttpGateway};
use product_search_client::web_app::errors::QUERY_ALREADY_EXISTS;
use product_search_client::web_app::model::{FilterSet, HistoryPage, SortDirection, SortField};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway(server: &MockServer) -> anyhow::Result<HttpGateway> {
    let config = ApiConfig::new(format!("{}/api/", server.uri()));
    Ok(HttpGateway::new(config)?)
}

#[tokio::test]
async fn test_estimate_count_posts_query() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search/validate_query/"))
        .and(body_json(json!({ "query": "red shoes" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let total = gateway(&server).await?.estimate_count("red shoes").await?;
    assert_eq!(total, 42);

    Ok(())
}

#[tokio::test]
async fn test_validation_error_carries_server_message() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search/validate_query/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "query too short" })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .await?
        .estimate_count("a")
        .await
        .expect_err("400 must be an error");

    assert_eq!(
        err,
        ApiError::Status {
            status: 400,
            message: Some("query too short".to_string()),
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_submit_posts_query_text() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search/"))
        .and(body_json(json!({ "query_text": "desk lamp" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).await?.submit_query("desk lamp").await?;

    Ok(())
}

#[tokio::test]
async fn test_submit_conflict() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "already searched" })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .await?
        .submit_query("red shoes")
        .await
        .expect_err("409 must be an error");

    assert_eq!(err, ApiError::Conflict("already searched".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_submit_conflict_without_body_uses_default_message() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search/"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .await?
        .submit_query("red shoes")
        .await
        .expect_err("409 must be an error");

    assert_eq!(err, ApiError::Conflict(QUERY_ALREADY_EXISTS.to_string()));

    Ok(())
}

#[tokio::test]
async fn test_history_page_is_requested_and_decoded() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/history/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 11,
            "next": null,
            "previous": "http://localhost:8000/api/search/history/?page=1",
            "current_page": 2,
            "total_pages": 2,
            "results": [{
                "id": 1,
                "query_text": "sofa",
                "created_at": "2024-03-01T10:15:00.123456Z",
                "is_completed": true,
                "total_results": 17
            }]
        })))
        .mount(&server)
        .await;

    let history = gateway(&server).await?.list_history(2).await?;

    assert_eq!(history.current_page, 2);
    assert_eq!(history.total_pages, 2);
    assert_eq!(history.total_count, 11);
    assert!(!history.has_more);
    assert_eq!(history.entries[0].query_text, "sofa");

    Ok(())
}

#[tokio::test]
async fn test_history_failure_degrades_to_empty_page() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/history/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let history = gateway(&server).await?.list_history(3).await?;
    assert_eq!(history, HistoryPage::default());

    Ok(())
}

#[tokio::test]
async fn test_delete_hits_entry_url() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/search/21/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).await?.delete_history(21).await?;

    Ok(())
}

#[tokio::test]
async fn test_delete_error_carries_server_message() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/search/21/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "no such entry" })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .await?
        .delete_history(21)
        .await
        .expect_err("404 must be an error");

    assert_eq!(err.server_message(), Some("no such entry"));

    Ok(())
}

#[tokio::test]
async fn test_results_send_sort_params_in_filter_order() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/result/"))
        .and(query_param("id", "9"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "current_page": 1,
            "total_pages": 1,
            "results": [{
                "id": 1,
                "external_id": 998877,
                "name": "Sneakers",
                "brand": "Acme",
                "supplier": "Acme Store",
                "supplier_rating": 4.7,
                "review_rating": 4.9,
                "feedbacks": 120,
                "price": 3490,
                "created_at": "2024-03-01T10:20:00Z",
                "search_query": 9
            }],
            "search_query": {
                "id": 9,
                "query_text": "sneakers",
                "is_completed": true,
                "total_results": 1,
                "created_at": "2024-03-01T10:15:00Z"
            }
        })))
        .mount(&server)
        .await;

    let filters = FilterSet::new()
        .with(SortField::ReviewRating, Some(SortDirection::Desc))
        .with(SortField::Price, Some(SortDirection::Asc));

    let page = gateway(&server).await?.fetch_results(9, 1, &filters).await?;

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.filters, filters);
    assert_eq!(page.query_info.map(|q| q.query_text), Some("sneakers".to_string()));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.query(),
        Some("id=9&page=1&review_rating_sort=desc&price_sort=asc")
    );

    Ok(())
}

#[tokio::test]
async fn test_results_error_status() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/result/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "query 9 not found" })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .await?
        .fetch_results(9, 1, &FilterSet::new())
        .await
        .expect_err("404 must be an error");

    assert_eq!(err.server_message(), Some("query 9 not found"));

    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() -> anyhow::Result<()> {
    let gateway = HttpGateway::new(ApiConfig::new("http://127.0.0.1:9/api"))?;

    let err = gateway
        .estimate_count("lamp")
        .await
        .expect_err("nothing listens on port 9");

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.server_message(), None);

    Ok(())
}
