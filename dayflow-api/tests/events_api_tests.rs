//! Event CRUD integration tests against the SQLite store

mod helpers;

use axum::http::StatusCode;
use helpers::{empty_request, json_request, ScriptedModel, TestApp, ALICE_TOKEN, BOB_TOKEN};
use serde_json::{json, Value};

async fn app() -> TestApp {
    TestApp::new(ScriptedModel::replying("unused")).await
}

fn sample_event() -> Value {
    json!({
        "title": "Write report",
        "description": "Quarterly numbers",
        "startTime": 9.5,
        "endTime": 11.25,
        "date": "2025-04-02",
        "emoji": "📝",
        "colorHex": "#10B981",
        "category": "Deep Work"
    })
}

async fn create(app: &TestApp, token: &str, body: &Value) -> Value {
    let (status, response) = app
        .send(json_request("POST", "/api/events", Some(token), body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", response);
    response["data"]["event"].clone()
}

#[tokio::test]
async fn create_then_fetch_returns_identical_fields() {
    let app = app().await;
    let created = create(&app, ALICE_TOKEN, &sample_event()).await;

    assert!(uuid::Uuid::parse_str(created["id"].as_str().unwrap()).is_ok());
    assert_eq!(created["startTime"], 9.5);
    assert_eq!(created["colorHex"], "#10B981");
    assert!(created["createdAt"].is_string());
    assert!(created.get("start_time").is_none());

    let (status, body) = app
        .send(empty_request("GET", "/api/events?date=2025-04-02", Some(ALICE_TOKEN)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["events"], json!([created]));
}

#[tokio::test]
async fn list_is_ordered_and_filtered_by_range() {
    let app = app().await;
    for (title, start, date) in [
        ("late", 15.0, "2025-04-02"),
        ("next day", 8.0, "2025-04-03"),
        ("early", 7.0, "2025-04-02"),
        ("outside", 9.0, "2025-04-10"),
    ] {
        create(
            &app,
            ALICE_TOKEN,
            &json!({"title": title, "startTime": start, "endTime": start + 1.0, "date": date}),
        )
        .await;
    }

    let (_, body) = app
        .send(empty_request(
            "GET",
            "/api/events?startDate=2025-04-01&endDate=2025-04-05",
            Some(ALICE_TOKEN),
        ))
        .await;
    let titles: Vec<&str> = body["data"]["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["early", "late", "next day"]);

    let (_, body) = app.send(empty_request("GET", "/api/events", Some(ALICE_TOKEN))).await;
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn create_rejects_invalid_fields_together() {
    let app = app().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/events",
            Some(ALICE_TOKEN),
            &json!({"title": " ", "startTime": 10, "endTime": 9, "date": "2025-4-2", "colorHex": "green"}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "endTime", "date", "colorHex"]);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = app().await;
    let created = create(&app, ALICE_TOKEN, &sample_event()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/events/{}", id),
            Some(ALICE_TOKEN),
            &json!({"title": "Final report", "endTime": 12}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"]["event"];
    assert_eq!(updated["title"], "Final report");
    assert_eq!(updated["endTime"], 12.0);
    assert_eq!(updated["startTime"], 9.5);
    assert_eq!(updated["emoji"], "📝");
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn update_cannot_invert_times() {
    let app = app().await;
    let created = create(&app, ALICE_TOKEN, &sample_event()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/events/{}", id),
            Some(ALICE_TOKEN),
            &json!({"startTime": 12}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "endTime");
}

#[tokio::test]
async fn update_lists_every_invalid_field() {
    let app = app().await;
    let created = create(&app, ALICE_TOKEN, &sample_event()).await;
    let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .send(json_request(
            "PUT",
            &uri,
            Some(ALICE_TOKEN),
            &json!({"title": "  ", "startTime": 30, "date": "bad"}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "startTime", "date"]);

    let (_, body) = app
        .send(empty_request("GET", "/api/events?date=2025-04-02", Some(ALICE_TOKEN)))
        .await;
    assert_eq!(body["data"]["events"][0]["title"], "Write report");
}

#[tokio::test]
async fn other_users_event_is_404() {
    let app = app().await;
    let created = create(&app, ALICE_TOKEN, &sample_event()).await;
    let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

    let (status, _) = app
        .send(json_request("PUT", &uri, Some(BOB_TOKEN), &json!({"title": "mine now"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(empty_request("DELETE", &uri, Some(BOB_TOKEN))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = app.send(empty_request("DELETE", &uri, Some(ALICE_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 1);

    let (status, _) = app.send(empty_request("DELETE", &uri, Some(ALICE_TOKEN))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_404() {
    let app = app().await;

    let (status, _) = app
        .send(empty_request("DELETE", "/api/events/not-a-uuid", Some(ALICE_TOKEN)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sync_with_clear_existing_replaces_rows() {
    let app = app().await;
    create(&app, ALICE_TOKEN, &sample_event()).await;
    create(&app, BOB_TOKEN, &sample_event()).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/events/sync",
            Some(ALICE_TOKEN),
            &json!({
                "clearExisting": true,
                "events": [
                    {"title": "Yoga", "startTime": 7, "endTime": 8, "date": "2025-04-02", "category": "health"},
                    {"title": "Lunch", "startTime": 12, "endTime": 13, "date": "2025-04-02"}
                ]
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = app.send(empty_request("GET", "/api/events", Some(ALICE_TOKEN))).await;
    let titles: Vec<&str> = body["data"]["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Yoga", "Lunch"]);

    let (_, body) = app.send(empty_request("GET", "/api/events", Some(BOB_TOKEN))).await;
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn sync_validation_names_entry() {
    let app = app().await;
    create(&app, ALICE_TOKEN, &sample_event()).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/events/sync",
            Some(ALICE_TOKEN),
            &json!({
                "clearExisting": true,
                "events": [
                    {"title": "Fine", "startTime": 7, "endTime": 8, "date": "2025-04-02"},
                    {"title": "Broken", "startTime": 30, "endTime": 31, "date": "2025-04-02"}
                ]
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "events[1].startTime");

    // Nothing was cleared
    let (_, body) = app.send(empty_request("GET", "/api/events", Some(ALICE_TOKEN))).await;
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_all_reports_count() {
    let app = app().await;
    create(&app, ALICE_TOKEN, &sample_event()).await;
    create(&app, ALICE_TOKEN, &sample_event()).await;

    let (status, body) = app.send(empty_request("DELETE", "/api/events", Some(ALICE_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 2);

    let (status, body) = app.send(empty_request("DELETE", "/api/events", Some(ALICE_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 0);
}
