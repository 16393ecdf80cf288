use chrono::{DateTime, Utc};
use claim::{assert_ok, assert_some};
use uuid::Uuid;

use crate::helpers::{
    hanging_up_database, live_database, spawn_app, switched_database, unreachable_database,
};

async fn error_message(response: reqwest::Response) -> String {
    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to decode body");
    assert_eq!(body["status"], "error");

    let error = assert_some!(body["error"].as_str()).to_owned();
    assert!(!error.is_empty());
    error
}

#[tokio::test]
async fn health_returns_500_when_the_database_is_unreachable() {
    let app = spawn_app(unreachable_database()).await;

    let response = app.get_health().await;

    error_message(response).await;
}

#[tokio::test]
async fn health_returns_500_when_the_database_hangs_up() {
    let app = spawn_app(hanging_up_database().await).await;

    let response = app.get_health().await;

    error_message(response).await;
}

#[tokio::test]
async fn failures_are_reported_on_every_call() {
    let app = spawn_app(unreachable_database()).await;

    for _ in 0..3 {
        error_message(app.get_health().await).await;
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = spawn_app(unreachable_database()).await;

    let response = app.get_health().await;

    let request_id = assert_some!(response.headers().get("x-request-id"));
    assert_ok!(Uuid::parse_str(assert_ok!(request_id.to_str())));
}

#[tokio::test]
async fn health_only_accepts_get() {
    let app = spawn_app(unreachable_database()).await;

    let response = reqwest::Client::new()
        .post(&format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 405);
}

#[tokio::test]
#[ignore = "requires a MySQL server configured through DB_* variables"]
async fn health_returns_200_with_the_server_time() {
    let app = spawn_app(live_database()).await;

    let response = app.get_health().await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to decode body");
    assert_eq!(body["status"], "ok");

    let mysql_time = assert_some!(body["mysql_time"].as_str());
    let mysql_time = assert_ok!(DateTime::parse_from_rfc3339(mysql_time)).with_timezone(&Utc);
    let drift = Utc::now() - mysql_time;
    assert!(drift.num_seconds().abs() < 60, "server time drifted by {}", drift);
}

#[tokio::test]
#[ignore = "requires a MySQL server configured through DB_* variables"]
async fn health_returns_500_for_wrong_credentials() {
    let mut database = live_database();
    database.password = Some(Uuid::new_v4().to_string());
    let app = spawn_app(database).await;

    let response = app.get_health().await;

    let error = error_message(response).await;
    assert!(error.contains("Access denied"), "unexpected error: {}", error);
}

#[tokio::test]
#[ignore = "requires a MySQL server configured through DB_* variables"]
async fn a_failed_check_does_not_affect_the_next_one() {
    let (database, switch) = switched_database(live_database()).await;
    let app = spawn_app(database).await;

    error_message(app.get_health().await).await;

    switch.connect();
    assert_eq!(app.get_health().await.status().as_u16(), 200);

    switch.disconnect();
    error_message(app.get_health().await).await;

    switch.connect();
    assert_eq!(app.get_health().await.status().as_u16(), 200);
}
