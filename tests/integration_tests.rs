use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use tower::ServiceExt;

use appointments::config::AppConfig;
use appointments::db::{self, SqliteBookingStore};
use appointments::handlers;
use appointments::services::auth::AdminSessions;
use appointments::services::calendar::FixedClock;
use appointments::services::scheduling::BookingService;
use appointments::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 5000,
        database_url: ":memory:".to_string(),
        admin_password: "test-password".to_string(),
        secret_key: "test-secret".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    // Thursday 2025-05-29; 2025-06-02 is the following Monday
    let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 5, 29).unwrap());
    Arc::new(AppState {
        bookings: BookingService::new(Arc::new(SqliteBookingStore::new(conn)), Arc::new(clock)),
        sessions: AdminSessions::new(&config.secret_key, &config.admin_password),
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking_body(name: &str, date: &str, time: &str) -> String {
    serde_json::json!({
        "name": name,
        "service": "Corte",
        "date": date,
        "time": time,
    })
    .to_string()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create(state: &Arc<AppState>, name: &str, date: &str, time: &str) -> (StatusCode, serde_json::Value) {
    send(state, json_request("POST", "/api/bookings", &booking_body(name, date, time))).await
}

async fn admin_token(state: &Arc<AppState>) -> String {
    let (status, json) = send(
        state,
        json_request("POST", "/api/admin/login", r#"{"password":"test-password"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

fn authed(method: &str, uri: &str, token: &str, body: Option<String>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));
    match body {
        Some(b) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(b))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let (status, json) = send(
        &state,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Public Booking Tests ──

#[tokio::test]
async fn test_create_booking() {
    let state = test_state();
    let (status, json) = create(&state, "Ana", "2025-06-02", "09:00").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "success");
    assert_eq!(json["booking"]["name"], "Ana");
    assert_eq!(json["booking"]["date"], "2025-06-02");
    assert_eq!(json["booking"]["time"], "09:00");
    assert!(json["booking"]["id"].is_i64());
}

#[tokio::test]
async fn test_double_booking_rejected() {
    let state = test_state();
    create(&state, "Ana", "2025-06-02", "09:00").await;

    let (status, json) = create(&state, "Luis", "2025-06-02", "09:00").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "slot_taken");
    assert_eq!(
        json["message"],
        "Lo siento, 2025-06-02 a las 09:00 ya está reservado."
    );
    assert_eq!(json["input"]["name"], "Luis");
}

#[tokio::test]
async fn test_weekend_rejected_with_input_echoed() {
    let state = test_state();
    let (status, json) = create(&state, "Ana", "2025-06-07", "09:00").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "weekend_not_allowed");
    assert_eq!(json["input"]["date"], "2025-06-07");
    assert_eq!(json["input"]["time"], "09:00");
}

#[tokio::test]
async fn test_past_date_rejected() {
    let state = test_state();
    let (status, json) = create(&state, "Ana", "2025-05-28", "09:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "past_date");
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let state = test_state();
    let (status, json) = send(
        &state,
        json_request("POST", "/api/bookings", r#"{"name":"Ana","service":""}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "missing_fields");
    assert_eq!(json["message"], "Por favor completa todos los campos.");
}

#[tokio::test]
async fn test_list_bookings_with_display_time() {
    let state = test_state();
    create(&state, "Ana", "2025-06-02", "09:00").await;
    create(&state, "Luis", "2025-06-02", "13:00").await;

    let (status, json) = send(
        &state,
        Request::builder().uri("/api/bookings").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Ana");
    assert_eq!(list[0]["time_display"], "9 AM");
    assert_eq!(list[1]["time_display"], "1 PM");
}

#[tokio::test]
async fn test_available_times() {
    let state = test_state();
    create(&state, "Ana", "2025-06-02", "09:00").await;
    create(&state, "Luis", "2025-06-02", "17:00").await;

    let (status, json) = send(
        &state,
        Request::builder()
            .uri("/api/available-times?date=2025-06-02")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!(["10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00"])
    );
}

#[tokio::test]
async fn test_available_times_requires_date() {
    let state = test_state();
    let (status, json) = send(
        &state,
        Request::builder()
            .uri("/api/available-times")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "invalid_date");
}

#[tokio::test]
async fn test_malformed_body_returns_json_error() {
    let state = test_state();
    let (status, json) = send(
        &state,
        json_request("POST", "/api/bookings", r#"{"name": "Ana","#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "bad_request");
    assert_eq!(json["message"], "Solicitud inválida.");
}

// ── Admin Tests ──

#[tokio::test]
async fn test_admin_login_wrong_password() {
    let state = test_state();
    let (status, json) = send(
        &state,
        json_request("POST", "/api/admin/login", r#"{"password":"nope"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "invalid_password");
}

#[tokio::test]
async fn test_admin_requires_auth() {
    let state = test_state();
    let (_, created) = create(&state, "Ana", "2025-06-02", "09:00").await;
    let id = created["booking"]["id"].as_i64().unwrap();

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/bookings/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = send(&state, authed("DELETE", &format!("/api/admin/bookings/{id}"), "bogus.token", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // still there
    let (_, list) = send(
        &state,
        Request::builder().uri("/api/bookings").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_get_and_update() {
    let state = test_state();
    let token = admin_token(&state).await;
    let (_, created) = create(&state, "Ana", "2025-06-02", "09:00").await;
    let id = created["booking"]["id"].as_i64().unwrap();

    let (status, json) = send(&state, authed("GET", &format!("/api/admin/bookings/{id}"), &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Ana");

    let (status, json) = send(
        &state,
        authed(
            "PUT",
            &format!("/api/admin/bookings/{id}"),
            &token,
            Some(booking_body("Ana María", "2025-06-03", "11:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["booking"]["name"], "Ana María");
    assert_eq!(json["booking"]["time"], "11:00");

    // the old slot is free again
    let (_, free) = send(
        &state,
        Request::builder()
            .uri("/api/available-times?date=2025-06-02")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(free.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_admin_update_conflict() {
    let state = test_state();
    let token = admin_token(&state).await;
    let (_, a) = create(&state, "Ana", "2025-06-02", "09:00").await;
    create(&state, "Luis", "2025-06-02", "10:00").await;
    let id = a["booking"]["id"].as_i64().unwrap();

    let (status, json) = send(
        &state,
        authed(
            "PUT",
            &format!("/api/admin/bookings/{id}"),
            &token,
            Some(booking_body("Ana", "2025-06-02", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "slot_taken");

    // keeping its own slot is fine
    let (status, _) = send(
        &state,
        authed(
            "PUT",
            &format!("/api/admin/bookings/{id}"),
            &token,
            Some(booking_body("Ana", "2025-06-02", "09:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_delete() {
    let state = test_state();
    let token = admin_token(&state).await;
    let (_, created) = create(&state, "Ana", "2025-06-02", "09:00").await;
    let id = created["booking"]["id"].as_i64().unwrap();

    let (status, _) = send(&state, authed("DELETE", &format!("/api/admin/bookings/{id}"), &token, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&state, authed("DELETE", &format!("/api/admin/bookings/{id}"), &token, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "not_found");

    let (status, _) = send(&state, authed("GET", &format!("/api/admin/bookings/{id}"), &token, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_logout() {
    let state = test_state();
    let token = admin_token(&state).await;

    let (status, _) = send(&state, authed("POST", "/api/admin/logout", &token, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&state, authed("GET", "/api/admin/bookings/1", &token, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_non_numeric_id_returns_json_error() {
    let state = test_state();
    let token = admin_token(&state).await;

    let (status, json) = send(&state, authed("GET", "/api/admin/bookings/abc", &token, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "bad_request");
}
