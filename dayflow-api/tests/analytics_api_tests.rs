//! Range analytics and task insight integration tests

mod helpers;

use axum::http::StatusCode;
use dayflow_api::services::range_report::EMPTY_RANGE_SUMMARY;
use helpers::{json_request, ScriptedModel, TestApp, ALICE_TOKEN};
use serde_json::json;

#[tokio::test]
async fn empty_range_reports_zeros_without_model_call() {
    let app = TestApp::new(ScriptedModel::replying("unused")).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/ai/analytics",
            Some(ALICE_TOKEN),
            &json!({"startDate": "2025-06-01", "endDate": "2025-06-07"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.text_model.calls(), 0);
    assert_eq!(
        body["data"],
        json!({
            "summary": EMPTY_RANGE_SUMMARY,
            "totalEvents": 0,
            "totalHours": 0.0,
            "averageEventsPerDay": 0.0,
            "dateRange": {"startDate": "2025-06-01", "endDate": "2025-06-07"}
        })
    );
}

#[tokio::test]
async fn inverted_range_does_not_divide_by_zero() {
    let app = TestApp::new(ScriptedModel::replying("unused")).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/ai/analytics",
            Some(ALICE_TOKEN),
            &json!({"startDate": "2025-06-07", "endDate": "2025-06-01"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["averageEventsPerDay"], 0.0);
}

#[tokio::test]
async fn range_with_events_uses_model_summary() {
    let app = TestApp::new(ScriptedModel::replying("A focused week.")).await;
    for (date, start, end) in [("2025-06-02", 9.0, 11.0), ("2025-06-03", 13.0, 14.5), ("2025-06-09", 9.0, 10.0)] {
        let (status, _) = app
            .send(json_request(
                "POST",
                "/api/events",
                Some(ALICE_TOKEN),
                &json!({"title": "Work", "startTime": start, "endTime": end, "date": date}),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/ai/analytics",
            Some(ALICE_TOKEN),
            &json!({"startDate": "2025-06-01", "endDate": "2025-06-07"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.text_model.calls(), 1);
    let data = &body["data"];
    assert_eq!(data["summary"], "A focused week.");
    assert_eq!(data["totalEvents"], 2);
    assert_eq!(data["totalHours"], 3.5);
    assert_eq!(data["averageEventsPerDay"], 0.3);
}

#[tokio::test]
async fn analytics_requires_both_dates() {
    let app = TestApp::new(ScriptedModel::replying("unused")).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/ai/analytics",
            Some(ALICE_TOKEN),
            &json!({"startDate": "2025-06-01"}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "endDate");
}

#[tokio::test]
async fn task_insight_normalizes_bullets() {
    let app = TestApp::new(ScriptedModel::replying(
        "- Start with the outline\n\n* Silence Slack\n- Extra",
    ))
    .await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/ai/task-insight",
            Some(ALICE_TOKEN),
            &json!({"title": "Write proposal", "startTime": 9, "endTime": 10.5, "category": "work"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["insight"],
        "• Start with the outline\n• Silence Slack"
    );
}

#[tokio::test]
async fn task_insight_falls_back_on_model_failure() {
    let app = TestApp::new(ScriptedModel::failing()).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/ai/task-insight",
            Some(ALICE_TOKEN),
            &json!({"title": "Evening review", "startTime": 20, "endTime": 20.5}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.text_model.calls(), 1);
    let insight = body["data"]["insight"].as_str().unwrap();
    assert!(insight.contains("Evening review"));
    assert!(insight.contains("30m"));
    assert!(insight.contains("evening"));
    assert_eq!(insight.lines().count(), 2);
}
