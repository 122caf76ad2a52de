use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use store_server::cart::Cart;
use store_server::state::AppState;
use store_server::{build_app, checkout, db};
use tower::ServiceExt;

async fn app() -> (Router, SqlitePool) {
    let pool = db::connect("sqlite::memory:").await.unwrap();
    let state = AppState::from_pool(pool.clone(), "test-secret", "http://localhost");
    (build_app(state), pool)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn game_body(title: &str) -> Value {
    json!({
        "title": title,
        "genre": "Adventure",
        "release_year": 2017,
        "platforms": "Switch",
        "developer": "Nintendo",
        "total_copies": 2
    })
}

fn customer_body(national_id: &str) -> Value {
    json!({
        "name": "Maria",
        "phone": "555-0101",
        "national_id": national_id,
        "address": "Rua A, 10"
    })
}

#[tokio::test]
async fn test_game_crud() {
    let (app, _) = app().await;

    let (status, created) = call(&app, Method::POST, "/api/games", Some(game_body("Zelda"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Zelda");
    assert_eq!(created["total_copies"], 2);
    assert_eq!(created["available_copies"], 2);
    let id = created["id"].as_i64().unwrap();

    let (status, list) = call(&app, Method::GET, "/api/games", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/games/{id}"),
        Some(json!({"total_copies": "5", "genre": "Action"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["total_copies"], 5);
    assert_eq!(updated["genre"], "Action");
    assert_eq!(updated["title"], "Zelda");

    let (status, body) = call(&app, Method::DELETE, &format!("/api/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = call(&app, Method::GET, &format!("/api/games/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");
    assert_eq!(body["code"], 3);
}

#[tokio::test]
async fn test_game_create_validation() {
    let (app, _) = app().await;

    let mut missing = game_body("Metroid");
    missing.as_object_mut().unwrap().remove("developer");
    let (status, body) = call(&app, Method::POST, "/api/games", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Required fields:"));

    let mut bad_year = game_body("Metroid");
    bad_year["release_year"] = json!("nineteen");
    let (status, body) = call(&app, Method::POST, "/api/games", Some(bad_year)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "release_year and total_copies must be valid integers"
    );

    let mut zero_copies = game_body("Metroid");
    zero_copies["total_copies"] = json!(0);
    let (status, _) = call(&app, Method::POST, "/api/games", Some(zero_copies)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut string_numbers = game_body("Metroid");
    string_numbers["release_year"] = json!("1986");
    string_numbers["total_copies"] = json!("3");
    let (status, created) = call(&app, Method::POST, "/api/games", Some(string_numbers)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["release_year"], 1986);
}

#[tokio::test]
async fn test_game_update_errors() {
    let (app, _) = app().await;
    let (_, created) = call(&app, Method::POST, "/api/games", Some(game_body("Kirby"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/games/{id}"),
        Some(json!({"total_copies": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "total_copies must be a positive integer");

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/games/9999",
        Some(json!({"title": "Ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, "/api/games/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sold_out_game_can_still_be_edited() {
    let (app, pool) = app().await;
    let mut body = game_body("Okami");
    body["total_copies"] = json!(1);
    let (_, created) = call(&app, Method::POST, "/api/games", Some(body)).await;
    let game_id = created["id"].as_i64().unwrap();
    let (_, customer) = call(&app, Method::POST, "/api/customers", Some(customer_body("333"))).await;

    let mut cart = Cart::new();
    cart.add(game_id, 1);
    checkout::checkout(&pool, &cart, customer["id"].as_i64().unwrap())
        .await
        .unwrap();

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/games/{game_id}"),
        Some(json!({"title": "Okami HD"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Okami HD");
    assert_eq!(updated["total_copies"], 0);

    // An explicit zero is still rejected
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/games/{game_id}"),
        Some(json!({"total_copies": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customer_crud_and_duplicate_national_id() {
    let (app, _) = app().await;

    let (status, created) =
        call(&app, Method::POST, "/api/customers", Some(customer_body("111"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, body) =
        call(&app, Method::POST, "/api/customers", Some(customer_body("111"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 9003);
    assert!(body["error"].as_str().unwrap().starts_with("Error saving customer:"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/customers",
        Some(json!({"name": "No phone"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Required fields: name, phone, national_id, address");

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/customers/{id}"),
        Some(json!({"phone": "555-9999"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-9999");
    assert_eq!(updated["name"], "Maria");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::GET, &format!("/api/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn test_customer_orders() {
    let (app, pool) = app().await;

    let (status, _) = call(&app, Method::GET, "/api/customers/42/orders", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, customer) = call(&app, Method::POST, "/api/customers", Some(customer_body("222"))).await;
    let customer_id = customer["id"].as_i64().unwrap();
    let (_, game) = call(&app, Method::POST, "/api/games", Some(game_body("Pikmin"))).await;
    let game_id = game["id"].as_i64().unwrap();

    let (status, orders) = call(
        &app,
        Method::GET,
        &format!("/api/customers/{customer_id}/orders"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([]));

    let mut cart = Cart::new();
    cart.add(game_id, 2);
    checkout::checkout(&pool, &cart, customer_id).await.unwrap();

    let (_, orders) = call(
        &app,
        Method::GET,
        &format!("/api/customers/{customer_id}/orders"),
        None,
    )
    .await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "COMPLETED");
    assert_eq!(orders[0]["lines"][0]["game_id"], game_id);
    assert_eq!(orders[0]["lines"][0]["quantity"], 2);

    let (_, game) = call(&app, Method::GET, &format!("/api/games/{game_id}"), None).await;
    assert_eq!(game["total_copies"], 0);
    assert_eq!(game["available_copies"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/games")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_and_request_id() {
    let (app, _) = app().await;

    let request = Request::builder()
        .uri("/api/games")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/api/games")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
