use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use hackreg_domain::validation::EmailPolicy;
use hackreg_registrations::domain::repository::OtpStore;
use hackreg_registrations::infra::mail::{LogMailer, Mailer};
use hackreg_registrations::infra::otp_store::MemoryOtpStore;
use hackreg_registrations::router::build_router;
use hackreg_registrations::state::AppState;
use hackreg_testing::fixture::{HEAD_EMAIL, sample_form_json};

use crate::helpers::{empty_sqlite, migrated_sqlite};

const ORIGIN: &str = "https://hackandro.netlify.app";

fn server_with(db: DatabaseConnection) -> (TestServer, MemoryOtpStore) {
    let otp_store = MemoryOtpStore::new();
    let state = AppState {
        db,
        otp_store: otp_store.clone(),
        mailer: Mailer::Log(LogMailer),
        email_policy: EmailPolicy::default(),
    };
    let server = TestServer::new(build_router(state, Some(ORIGIN))).unwrap();
    (server, otp_store)
}

/// Server without a database: only paths that fail before touching storage
/// (or that report storage as unavailable) are meaningful here.
fn server() -> (TestServer, MemoryOtpStore) {
    server_with(DatabaseConnection::Disconnected)
}

async fn verify(server: &TestServer, store: &MemoryOtpStore, email: &str) {
    server
        .post("/send-otp")
        .json(&json!({ "email": email }))
        .await
        .assert_status_ok();
    let code = store.get(email).await.unwrap().unwrap().code;
    server
        .post("/verify-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn should_answer_liveness_with_request_id() {
    let (server, _) = server();
    let resp = server.get("/healthz").await;
    resp.assert_status_ok();
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let (server, _) = server();
    let resp = server.get("/readyz").await;
    resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_allow_configured_origin() {
    let (server, _) = server();
    let resp = server
        .get("/healthz")
        .add_header(header::ORIGIN, HeaderValue::from_static(ORIGIN))
        .await;
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
}

#[tokio::test]
async fn should_reject_otp_request_for_foreign_domain() {
    let (server, store) = server();
    let resp = server
        .post("/send-otp")
        .json(&json!({ "email": "ravi@gmail.com" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_EMAIL");
    assert!(store.get("ravi@gmail.com").await.unwrap().is_none());
}

#[tokio::test]
async fn should_send_and_verify_otp() {
    let (server, store) = server();

    let resp = server
        .post("/send-otp")
        .json(&json!({ "email": HEAD_EMAIL }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["message"], format!("OTP sent to {HEAD_EMAIL}"));

    let code = store.get(HEAD_EMAIL).await.unwrap().unwrap().code;
    let resp = server
        .post("/verify-otp")
        .json(&json!({ "email": HEAD_EMAIL, "otp": code }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["message"], "Email verified successfully");
    assert!(store.is_verified(HEAD_EMAIL).await.unwrap());
}

#[tokio::test]
async fn should_report_otp_not_requested() {
    let (server, _) = server();
    let resp = server
        .post("/verify-otp")
        .json(&json!({ "email": HEAD_EMAIL, "otp": "123456" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "OTP_NOT_REQUESTED");
}

#[tokio::test]
async fn should_return_field_errors_for_incomplete_form() {
    let (server, _) = server();
    let mut form = sample_form_json("Null Pointers");
    form["password"] = json!("short");
    form.as_object_mut().unwrap().remove("member1Name");

    let resp = server.post("/registrations").json(&form).await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(
        body["fields"]["password"],
        "Password must be at least 8 characters"
    );
    assert_eq!(body["fields"]["member1Name"], "Member 1 name required");
}

#[tokio::test]
async fn should_hide_storage_failures_behind_internal_error() {
    // Connected, but the registrations table was never created.
    let (server, _) = server_with(empty_sqlite().await);
    let resp = server
        .post("/registrations")
        .json(&sample_form_json("Null Pointers"))
        .await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json();
    assert_eq!(body, json!({ "kind": "INTERNAL", "message": "internal error" }));
}

#[tokio::test]
async fn should_register_verified_team_and_serve_it_back() {
    let (server, store) = server_with(migrated_sqlite().await);
    verify(&server, &store, HEAD_EMAIL).await;

    let resp = server
        .post("/registrations")
        .json(&sample_form_json("Null Pointers"))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let created: Value = resp.json();
    let team_number = created["teamNumber"].as_str().unwrap().to_owned();
    assert!(team_number.starts_with("TEAM") && team_number.len() == 9);
    assert!(created.get("password").is_none());

    let list: Value = server.get("/registrations").await.json();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["teamNumber"], team_number);

    let id = created["id"].as_str().unwrap();
    let resp = server
        .patch(&format!("/registrations/{id}"))
        .json(&json!({ "round2": true }))
        .await;
    resp.assert_status_ok();
    let shortlisted: Value = server.get("/registrations?round2=true").await.json();
    assert_eq!(shortlisted[0]["id"], id);

    let resp = server.get("/registrations/export?round2=true").await;
    resp.assert_status_ok();
    assert!(resp.text().contains(&team_number));
}

#[tokio::test]
async fn should_reject_duplicate_name_for_second_verified_team() {
    let (server, store) = server_with(migrated_sqlite().await);
    verify(&server, &store, HEAD_EMAIL).await;
    server
        .post("/registrations")
        .json(&sample_form_json("Null Pointers"))
        .await
        .assert_status(StatusCode::CREATED);

    verify(&server, &store, HEAD_EMAIL).await;
    let resp = server
        .post("/registrations")
        .json(&sample_form_json("NULL POINTERS"))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "DUPLICATE_TEAM_NAME");
}

#[tokio::test]
async fn should_report_unknown_registration_on_patch() {
    let (server, _) = server_with(migrated_sqlite().await);
    let resp = server
        .patch("/registrations/0195a4c2-7b1e-7000-8000-000000000001")
        .json(&json!({ "certificateSent": true }))
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "REGISTRATION_NOT_FOUND");
}

#[tokio::test]
async fn should_answer_non_uuid_id_with_json_error() {
    let (server, _) = server();
    let resp = server
        .patch("/registrations/TEAM24680")
        .json(&json!({ "round2": true }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "MALFORMED_REQUEST");
    assert!(body["message"].as_str().unwrap().starts_with("malformed request: "));
}

#[tokio::test]
async fn should_answer_unparseable_body_with_json_error() {
    let (server, _) = server();
    let resp = server
        .patch("/registrations/0195a4c2-7b1e-7000-8000-000000000001")
        .content_type("application/json")
        .bytes(Bytes::from_static(br#"{"round2": "#))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "MALFORMED_REQUEST");

    let resp = server
        .post("/send-otp")
        .json(&json!({ "email": 42 }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn should_reject_empty_patch() {
    let (server, _) = server();
    let resp = server
        .patch("/registrations/0195a4c2-7b1e-7000-8000-000000000001")
        .json(&json!({}))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "MISSING_DATA");
}
