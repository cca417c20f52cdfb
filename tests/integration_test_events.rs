mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{TestApp, ADMIN_TOKEN};
use serde_json::json;

fn event_payload(title: &str, days_out: i64) -> serde_json::Value {
    json!({
        "event_title": title,
        "date": (Utc::now() + Duration::days(days_out)).date_naive(),
        "time": "9:00 PM",
        "location": "The Warehouse",
        "unit_price": 2500
    })
}

#[tokio::test]
async fn event_crud_round_trip() {
    let app = TestApp::new().await;

    let (status, created) = app
        .request("POST", "/api/v1/events", Some(event_payload("Opening", 10)), Some(ADMIN_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = app
        .request("GET", &format!("/api/v1/events/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["event_title"], "Opening");

    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/v1/events/{}", id),
            Some(json!({"location": "New Venue"})),
            Some(ADMIN_TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "New Venue");
    assert_eq!(updated["event_title"], "Opening", "unset fields are preserved");

    let (status, _) = app
        .request("DELETE", &format!("/api/v1/events/{}", id), None, Some(ADMIN_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("GET", &format!("/api/v1/events/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_public_and_date_ordered() {
    let app = TestApp::new().await;
    app.seed_event("Later", (Utc::now() + Duration::days(20)).date_naive()).await;
    app.seed_event("Sooner", (Utc::now() + Duration::days(2)).date_naive()).await;

    let (status, body) = app.request("GET", "/api/v1/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_title"], "Sooner");
    assert_eq!(events[1]["event_title"], "Later");
}

#[tokio::test]
async fn mutations_require_the_admin_token() {
    let app = TestApp::new().await;
    let event = app.seed_event("Guarded", (Utc::now() + Duration::days(5)).date_naive()).await;

    let (status, _) = app
        .request("POST", "/api/v1/events", Some(event_payload("Nope", 1)), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/v1/events/{}", event.id),
            Some(json!({"location": "Hijacked"})),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("DELETE", &format!("/api/v1/events/{}", event.id), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let app = TestApp::new().await;

    let mut payload = event_payload("  ", 1);
    payload["event_title"] = json!("   ");
    let (status, _) = app
        .request("POST", "/api/v1/events", Some(payload), Some(ADMIN_TOKEN))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn past_events_are_never_the_next_upcoming() {
    let app = TestApp::new().await;
    app.seed_event("Long Gone", (Utc::now() - Duration::days(30)).date_naive()).await;
    let future = app.seed_event("Still Coming", (Utc::now() + Duration::days(3)).date_naive()).await;

    let next = app
        .state
        .event_repo
        .find_next_upcoming(Utc::now().date_naive())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.id, future.id);
}
