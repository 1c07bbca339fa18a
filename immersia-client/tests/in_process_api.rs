// immersia-client/tests/in_process_api.rs
// ApiClient against a fake backend Router, driven in-process

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use immersia_client::{ApiClient, ClientError, OneshotHttpClient};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::ResourceId;
use shared::models::{GameUpdate, UserCreate, UserRole};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
struct Backend {
    fail_catalog: bool,
    puts: Arc<Mutex<Vec<(String, Value)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer tok-1")
}

async fn games(State(state): State<Backend>) -> Json<Value> {
    if state.fail_catalog {
        return Json(json!({"status": false, "message": "db down"}));
    }
    Json(json!({
        "status": true,
        "data": [
            {"id": 1, "title": "FIFA", "price": 1500, "time_slot": "15"},
            {"id": 2, "title": "COD", "price": 2000.5}
        ]
    }))
}

async fn put_game(
    State(state): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no token"})));
    }
    state.puts.lock().push((id.to_string(), body));
    (StatusCode::OK, Json(json!({"message": "updated"})))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["username"] == "admin" && body["password"] == "pw" {
        (StatusCode::OK, Json(json!({"message": "ok", "token": "tok-1"})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"})))
    }
}

async fn create_user(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"_id": 77, "phone": body["phone"], "email": body["email"], "role": "customer"}))
}

async fn find_user(
    Path(id): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if id == "77" && q.get("phone").map(String::as_str) == Some("+2348012345678") {
        (StatusCode::OK, Json(json!({"_id": "77", "phone": "+2348012345678"})))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"message": "User not found"})))
    }
}

async fn export(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    let body = format!("xlsx:{}:{}", q["startDate"], q["endDate"]);
    (StatusCode::OK, body.into_bytes())
}

async fn transactions(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(q["startDate"], "2024-01-01");
    Json(json!([
        {"id": "t1", "title": "FIFA", "quantity": 2, "totalAmount": 3000,
         "customerName": "Ada", "date": "2024-01-02"}
    ]))
}

fn router(state: Backend) -> Router {
    Router::new()
        .route("/admin/games", get(games))
        .route("/admin/games/{id}", put(put_game))
        .route("/admin/roles", post(login))
        .route("/admin/users", post(create_user))
        .route("/admin/users/{id}", get(find_user))
        .route("/report/export", get(export))
        .route("/transaction", get(transactions))
        .with_state(state)
}

fn api(state: Backend) -> ApiClient<OneshotHttpClient> {
    ApiClient::new(OneshotHttpClient::new(router(state)))
}

#[tokio::test]
async fn test_list_games_decodes_durations() {
    let games = api(Backend::default()).list_games().await.unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].duration_minutes, 15);
    assert_eq!(games[0].unit_price, Decimal::from(1500));
    assert_eq!(games[1].duration_minutes, 10);
    assert_eq!(games[1].unit_price, Decimal::new(20005, 1));
}

#[tokio::test]
async fn test_list_games_status_false_is_error() {
    let state = Backend {
        fail_catalog: true,
        ..Default::default()
    };
    let err = api(state).list_games().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_login_applies_token_for_writes() {
    let state = Backend::default();
    let api = api(state.clone());

    let err = api.update_game_duration(1, 30).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)), "{err:?}");

    assert!(api.login("admin", "wrong").await.is_err());
    assert!(api.token().is_none());

    let login = api.login("admin", "pw").await.unwrap();
    assert_eq!(login.token, "tok-1");
    assert_eq!(api.token().as_deref(), Some("tok-1"));

    api.update_game_duration(1, 30).await.unwrap();
    api.update_game(
        2,
        &GameUpdate {
            title: "COD MW".into(),
            url: None,
            price: Decimal::from(2500),
            duration_minutes: 20,
        },
    )
    .await
    .unwrap();

    let puts = state.puts.lock().clone();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0], ("1".to_string(), json!({"time_slot": 30})));
    assert_eq!(puts[1].1["title"], "COD MW");
    assert_eq!(puts[1].1["time_slot"], 20);

    api.logout();
    assert!(api.token().is_none());
}

#[tokio::test]
async fn test_user_register_and_lookup() {
    let api = api(Backend::default());
    let user = api
        .create_user(&UserCreate {
            phone: "+2348012345678".into(),
            email: Some("ada@example.com".into()),
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(user.id, Some(ResourceId::from(77)));
    assert_eq!(user.role, Some(UserRole::Customer));

    let found = api
        .find_user(&ResourceId::from("77"), "+2348012345678")
        .await
        .unwrap();
    assert_eq!(found.phone, "+2348012345678");

    let missing = api
        .find_user(&ResourceId::from("78"), "+2348012345678")
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_report_queries() {
    let api = api(Backend::default());
    let bytes = api.export_report("2024-01-01", "2024-01-31").await.unwrap();
    assert_eq!(bytes, b"xlsx:2024-01-01:2024-01-31");

    let records = api.transactions("2024-01-01", "2024-01-31").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].customer_name, "Ada");
}
