use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use booking_desk::config::AppConfig;
use booking_desk::db;
use booking_desk::handlers;
use booking_desk::services::{auth, booking};
use booking_desk::services::mail::{Email, Mailer};
use booking_desk::state::AppState;

// ── Mock Mailer ──

#[derive(Clone, Default)]
struct MockMailer {
    sent: Arc<Mutex<Vec<Email>>>,
    fail: Arc<AtomicBool>,
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("relay unavailable");
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Accepts the newest booking before failing, as an admin acting while the
/// confirmation is still in flight would.
struct AcceptThenFailMailer {
    db: Arc<Mutex<rusqlite::Connection>>,
}

#[async_trait]
impl Mailer for AcceptThenFailMailer {
    async fn send(&self, _email: &Email) -> anyhow::Result<()> {
        {
            let mut db = self.db.lock().unwrap();
            let id: i64 = db.query_row("SELECT MAX(id) FROM bookings", [], |row| row.get(0))?;
            booking::accept_booking(&mut db, id)?;
        }
        anyhow::bail!("relay unavailable")
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3030,
        database_url: ":memory:".to_string(),
        mail_api_url: "".to_string(),
        mail_api_key: "".to_string(),
        mail_from: "bookings@test.local".to_string(),
        mail_timeout_secs: 5,
        admin_username: "admin".to_string(),
        admin_password: "letmein".to_string(),
        bcrypt_cost: 4,
    }
}

fn test_state_with_mailer() -> (Arc<AppState>, MockMailer) {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    auth::seed_admin(&conn, &config).unwrap();
    let mailer = MockMailer::default();
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        mailer: Box::new(mailer.clone()),
    });
    (state, mailer)
}

fn test_state() -> Arc<AppState> {
    test_state_with_mailer().0
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn alice_booking() -> serde_json::Value {
    json!({
        "name": "Alice",
        "service": "Haircut",
        "date": "2025-03-01",
        "time": "10:00 AM",
        "paymentMethod": "pay_in_store",
        "email": "a@x.com",
        "contactNo": "555-1111"
    })
}

async fn body_json(res: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> Response {
    test_app(state.clone()).oneshot(req).await.unwrap()
}

fn count(state: &Arc<AppState>, table: &str) -> i64 {
    let db = state.db.lock().unwrap();
    db.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

async fn booked_times(state: &Arc<AppState>, date: &str) -> Vec<String> {
    let res = send(state, json_request("POST", "/booked-times", json!({ "date": date }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    serde_json::from_value(body_json(res).await).unwrap()
}

// ── Health Check ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let res = send(&state, empty_request("GET", "/health")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "ok");
}

// ── Availability ──

#[tokio::test]
async fn test_booked_times_empty_for_free_date() {
    let state = test_state();
    assert!(booked_times(&state, "2025-03-01").await.is_empty());
}

#[tokio::test]
async fn test_booked_times_malformed_date_fails_open() {
    let state = test_state();
    assert!(booked_times(&state, "the first of march").await.is_empty());
}

#[tokio::test]
async fn test_booked_times_includes_submitted_slot() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    assert_eq!(booked_times(&state, "2025-03-01").await, vec!["10:00 AM"]);
    assert!(booked_times(&state, "2025-03-02").await.is_empty());
}

// ── Submission ──

#[tokio::test]
async fn test_submit_booking_creates_pending_booking() {
    let (state, mailer) = test_state_with_mailer();

    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    assert!(json["message"].as_str().unwrap().contains("successfully"));
    let id = json["booking"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(json["booking"]["date"], "2025-03-01");
    assert_eq!(json["booking"]["time"], "10:00:00");
    assert_eq!(json["booking"]["status"], "Pending");

    assert_eq!(count(&state, "customers"), 1);
    assert_eq!(count(&state, "bookings"), 1);

    let booking = {
        let db = state.db.lock().unwrap();
        booking_desk::db::queries::get_booking(&db, id).unwrap().unwrap()
    };
    assert_eq!(booking.status, booking_desk::models::BookingStatus::Pending);
    assert_eq!(booking.date, "2025-03-01");
    assert_eq!(booking.time, "10:00:00");
    assert_eq!(booking.email, "a@x.com");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert!(sent[0].text.contains("Haircut on 2025-03-01 at 10:00 AM"));
}

#[tokio::test]
async fn test_unknown_service_rejected_without_rows() {
    let (state, mailer) = test_state_with_mailer();
    let mut body = alice_booking();
    body["service"] = json!("Massage");

    let res = send(&state, json_request("POST", "/submit-booking", body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Service not found");

    assert_eq!(count(&state, "customers"), 0);
    assert_eq!(count(&state, "bookings"), 0);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_submission_for_same_slot_conflicts() {
    let state = test_state();

    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut body = alice_booking();
    body["name"] = json!("Bob");
    body["service"] = json!("Shave");
    let res = send(&state, json_request("POST", "/submit-booking", body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Time slot is already booked.");

    assert_eq!(count(&state, "bookings"), 1);
    assert_eq!(count(&state, "customers"), 1);
}

#[tokio::test]
async fn test_same_time_on_other_date_is_free() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut body = alice_booking();
    body["date"] = json!("2025-03-02");
    let res = send(&state, json_request("POST", "/submit-booking", body)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(count(&state, "bookings"), 2);
    // every submission creates its own customer row
    assert_eq!(count(&state, "customers"), 2);
}

#[tokio::test]
async fn test_time_outside_slots_rejected() {
    let state = test_state();
    let mut body = alice_booking();
    body["time"] = json!("7:00 AM");

    let res = send(&state, json_request("POST", "/submit-booking", body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&state, "bookings"), 0);
}

#[tokio::test]
async fn test_unsupported_payment_method_rejected() {
    let state = test_state();
    let mut body = alice_booking();
    body["paymentMethod"] = json!("crypto");

    let res = send(&state, json_request("POST", "/submit-booking", body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&state, "bookings"), 0);
}

#[tokio::test]
async fn test_mail_failure_withdraws_booking() {
    let (state, mailer) = test_state_with_mailer();
    mailer.fail.store(true, Ordering::SeqCst);

    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await["error"], "Error sending confirmation email");

    assert_eq!(count(&state, "bookings"), 0);
    assert_eq!(count(&state, "customers"), 0);
    assert!(booked_times(&state, "2025-03-01").await.is_empty());

    // the slot is bookable once mail works again
    mailer.fail.store(false, Ordering::SeqCst);
    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_mail_failure_after_accept_keeps_booking() {
    let db = Arc::new(Mutex::new(db::init_db(":memory:").unwrap()));
    let state = Arc::new(AppState {
        db: db.clone(),
        config: test_config(),
        mailer: Box::new(AcceptThenFailMailer { db }),
    });

    let res = send(&state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_json(res).await["booking"]["status"], "Completed");

    assert_eq!(count(&state, "bookings"), 1);
    assert_eq!(count(&state, "customers"), 1);
    assert_eq!(income(&state).await, 20.0);
    let res = send(&state, empty_request("GET", "/totals")).await;
    let totals = body_json(res).await;
    assert_eq!(totals["totalBookings"], 1);
    assert_eq!(totals["totalIncome"].as_f64().unwrap(), 20.0);
}

// ── Acceptance & Income ──

async fn submit_alice(state: &Arc<AppState>) -> i64 {
    let res = send(state, json_request("POST", "/submit-booking", alice_booking())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await["booking"]["id"].as_i64().unwrap()
}

async fn income(state: &Arc<AppState>) -> f64 {
    let res = send(state, empty_request("GET", "/income")).await;
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["totalIncome"].as_f64().unwrap()
}

#[tokio::test]
async fn test_accept_booking_credits_price() {
    let state = test_state();
    let id = submit_alice(&state).await;
    assert_eq!(income(&state).await, 0.0);

    let res = send(&state, empty_request("PUT", &format!("/bookings/accept/{id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await["message"],
        "Booking status updated successfully"
    );

    assert_eq!(income(&state).await, 20.0);

    let res = send(&state, empty_request("GET", "/bookings")).await;
    let json = body_json(res).await;
    assert_eq!(json[0]["status"], "Completed");

    let res = send(&state, empty_request("GET", "/totals")).await;
    let json = body_json(res).await;
    assert_eq!(json["totalBookings"], 1);
    assert_eq!(json["totalIncome"].as_f64().unwrap(), 20.0);
}

#[tokio::test]
async fn test_accept_twice_credits_once() {
    let state = test_state();
    let id = submit_alice(&state).await;

    let res = send(&state, empty_request("PUT", &format!("/bookings/accept/{id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = send(&state, empty_request("PUT", &format!("/bookings/accept/{id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["message"], "Booking is already completed");

    assert_eq!(income(&state).await, 20.0);
    let res = send(&state, empty_request("GET", "/totals")).await;
    assert_eq!(body_json(res).await["totalBookings"], 1);
}

#[tokio::test]
async fn test_accept_missing_booking() {
    let state = test_state();
    let res = send(&state, empty_request("PUT", "/bookings/accept/999")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["error"], "Booking not found");
    assert_eq!(income(&state).await, 0.0);
}

#[tokio::test]
async fn test_totals_empty() {
    let state = test_state();
    let res = send(&state, empty_request("GET", "/totals")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["totalBookings"], 0);
    assert_eq!(json["totalIncome"].as_f64().unwrap(), 0.0);
}

// ── Listing & Deletion ──

#[tokio::test]
async fn test_list_bookings_joined() {
    let state = test_state();
    submit_alice(&state).await;

    let res = send(&state, empty_request("GET", "/bookings")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["customerName"], "Alice");
    assert_eq!(rows[0]["serviceType"], "Haircut");
    assert_eq!(rows[0]["staffName"], "Marco");
    assert_eq!(rows[0]["servicePrice"].as_f64().unwrap(), 20.0);
    assert_eq!(rows[0]["paymentMethod"], "pay_in_store");
    assert_eq!(rows[0]["status"], "Pending");
}

#[tokio::test]
async fn test_list_customers() {
    let state = test_state();
    submit_alice(&state).await;

    let res = send(&state, empty_request("GET", "/customers")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Alice");
    assert_eq!(json[0]["contactNo"], "555-1111");
}

#[tokio::test]
async fn test_services_by_type() {
    let state = test_state();

    let res = send(&state, empty_request("GET", "/services?serviceType=Haircut")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["serviceType"], "Haircut");
    assert_eq!(json[0]["servicePrice"].as_f64().unwrap(), 20.0);

    let res = send(&state, empty_request("GET", "/services?serviceType=Nails")).await;
    assert!(body_json(res).await.as_array().unwrap().is_empty());

    let res = send(&state, empty_request("GET", "/services")).await;
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_delete_booking_frees_slot() {
    let state = test_state();
    let id = submit_alice(&state).await;

    let res = send(&state, empty_request("DELETE", &format!("/bookings/delete/{id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["message"], "Booking deleted successfully");
    assert!(booked_times(&state, "2025-03-01").await.is_empty());

    let res = send(&state, empty_request("DELETE", &format!("/bookings/delete/{id}"))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_customer_removes_their_bookings() {
    let state = test_state();
    submit_alice(&state).await;
    let customer_id = {
        let db = state.db.lock().unwrap();
        booking_desk::db::queries::list_customers(&db).unwrap()[0].customer_id
    };

    let res = send(
        &state,
        empty_request("DELETE", &format!("/customers/delete/{customer_id}")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(count(&state, "customers"), 0);
    assert_eq!(count(&state, "bookings"), 0);

    let res = send(&state, empty_request("DELETE", "/customers/delete/999")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Login ──

#[tokio::test]
async fn test_login_success() {
    let state = test_state();
    let res = send(
        &state,
        json_request("POST", "/login", json!({ "username": "admin", "password": "letmein" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["message"], "Login successful");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let state = test_state();
    let res = send(
        &state,
        json_request("POST", "/login", json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let state = test_state();
    let res = send(
        &state,
        json_request("POST", "/login", json!({ "username": "root", "password": "letmein" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
