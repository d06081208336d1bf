//! Integration tests for `OffClient` using wiremock HTTP mocks.

use foodscout_off::{ClientOptions, OffClient, OffError, ProductLookup};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OffClient {
    OffClient::with_base_url(base_url, 5).expect("client construction should not fail")
}

fn test_client_with_retries(base_url: &str, max_retries: u32) -> OffClient {
    OffClient::new(&ClientOptions {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        user_agent: "foodscout-test/0.1".to_string(),
        max_retries,
        backoff_base_ms: 0,
    })
    .expect("client construction should not fail")
}

#[tokio::test]
async fn search_products_sends_paging_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "oat milk"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "12"))
        .and(query_param("json", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "page": 2,
            "products": [
                { "code": "111", "product_name": "Oat Drink", "nutrition_grades": "b" },
                { "code": "222", "product_name": "Oat Barista" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client
        .search_products("oat milk", 2, 12)
        .await
        .expect("search should succeed");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].code.as_deref(), Some("111"));
    assert_eq!(products[0].grade_label(), "B");
    assert_eq!(products[1].display_name(), "Oat Barista");
}

#[tokio::test]
async fn search_products_skips_undecodable_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "code": "1" }, 42, null, { "code": "2" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client.search_products("food", 1, 12).await.unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn search_products_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client.search_products("zzzz", 1, 12).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn search_products_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search_products("food", 1, 12).await;
    assert!(
        matches!(result, Err(OffError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn search_products_retries_transient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "products": [{ "code": "9" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server.uri(), 2);
    let products = client.search_products("food", 1, 12).await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn search_products_reports_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search_products("food", 1, 12).await;
    assert!(
        matches!(result, Err(OffError::RateLimited { retry_after_secs: 7 })),
        "expected RateLimited(7), got: {result:?}"
    );
}

#[tokio::test]
async fn search_products_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search_products("food", 1, 12).await;
    assert!(matches!(result, Err(OffError::Deserialize { .. })));
}

#[tokio::test]
async fn get_product_returns_found_product() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/3017620422003.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "3017620422003",
            "status": 1,
            "status_verbose": "product found",
            "product": {
                "code": "3017620422003",
                "product_name": "Nutella",
                "labels_tags": ["en:no-palm-oil-free"],
                "nutriments": { "energy-kcal_100g": 539, "sugars_100g": 56.3 }
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.get_product("3017620422003").await.unwrap();
    let product = lookup.into_product().expect("product should be found");

    assert_eq!(product.display_name(), "Nutella");
    assert_eq!(product.nutriments.unwrap().sugars, Some(56.3));
}

#[tokio::test]
async fn get_product_status_zero_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/0000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "0000",
            "status": 0,
            "status_verbose": "product not found"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.get_product("0000").await.unwrap();
    assert_eq!(lookup, ProductLookup::NotFound);
}

#[tokio::test]
async fn get_product_http_404_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/404.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(
        client.get_product("404").await.unwrap(),
        ProductLookup::NotFound
    );
}

#[tokio::test]
async fn get_product_transport_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/500.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.get_product("500").await.is_err());
}

#[tokio::test]
async fn list_categories_parses_tags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "tags": [
                { "id": "en:beverages", "name": "Beverages", "products": 120_000, "url": "x" },
                { "id": "en:snacks", "name": "Snacks", "products": 80_000 }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let tags = client.list_categories().await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].id, "en:beverages");
    assert_eq!(tags[1].products, 80_000);
}

#[tokio::test]
async fn category_products_uses_paged_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/category/snacks.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "products": [{ "code": "a" }] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/category/snacks/2.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "products": [{ "code": "b" }, { "code": "c" }] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(client.category_products("snacks", 1).await.unwrap().len(), 1);
    assert_eq!(client.category_products("snacks", 2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn category_products_page_zero_uses_first_page_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/category/beverages.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "code": "1", "product_name": "Cola" }, "garbage"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client.category_products("beverages", 0).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_name.as_deref(), Some("Cola"));
}

#[tokio::test]
async fn category_products_unknown_category_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/category/nothing/2.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.category_products("nothing", 2).await.unwrap_err();
    assert!(matches!(err, OffError::UnexpectedStatus { status: 404, .. }));
}
