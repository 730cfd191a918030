//! Team directory CRUD through the HTTP API.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::TestApp;

async fn logged_in() -> TestApp {
    let mut app = TestApp::new();
    app.register("admin@example.com", "secret1").await;
    app
}

async fn create_member(app: &mut TestApp, name: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/team",
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "role": "Engineer",
                "department": "Platform",
                "avatarUrl": "",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .expect("list should be an array")
        .iter()
        .map(|m| m["id"].as_i64().expect("id should be a number"))
        .collect()
}

#[tokio::test]
async fn test_create_and_read_member() {
    let mut app = logged_in().await;

    let member = create_member(&mut app, "Rita").await;
    assert_eq!(member["name"], "Rita");
    assert_eq!(member["avatarUrl"], Value::Null);
    assert_eq!(member["deleted"], false);
    assert!(member["createdAt"].is_string());

    let (status, fetched) = app.get(&format!("/api/team/{}", member["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, member);

    let (status, list) = app.get("/api/team").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![member["id"].as_i64().unwrap_or_default()]);
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let mut app = logged_in().await;

    let (status, body) = app
        .post(
            "/api/team",
            json!({
                "name": "Rita",
                "email": "rita@example.com",
                "role": "   ",
                "department": "Product",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "role is required");

    let (status, _) = app
        .post(
            "/api/team",
            json!({
                "name": "Rita",
                "email": "rita-at-example.com",
                "role": "Designer",
                "department": "Product",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_updates_only_supplied_fields() {
    let mut app = logged_in().await;
    let member = create_member(&mut app, "Rita").await;
    let uri = format!("/api/team/{}", member["id"]);

    let (status, updated) = app
        .patch(
            &uri,
            json!({ "role": "Staff Engineer", "avatarUrl": "https://cdn.example.com/r.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "Staff Engineer");
    assert_eq!(updated["avatarUrl"], "https://cdn.example.com/r.png");
    assert_eq!(updated["name"], member["name"]);
    assert_eq!(updated["email"], member["email"]);
    assert_eq!(updated["department"], member["department"]);

    let (status, cleared) = app.patch(&uri, json!({ "avatarUrl": "" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["avatarUrl"], Value::Null);
}

#[tokio::test]
async fn test_patch_null_avatar_clears_it() {
    let mut app = logged_in().await;
    let member = create_member(&mut app, "Rita").await;
    let uri = format!("/api/team/{}", member["id"]);

    let (status, _) = app
        .patch(&uri, json!({ "avatarUrl": "https://cdn.example.com/r.png" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, cleared) = app.patch(&uri, json!({ "avatarUrl": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["avatarUrl"], Value::Null);
    assert_eq!(cleared["role"], member["role"]);
}

#[tokio::test]
async fn test_patch_rejects_empty_or_invalid_body() {
    let mut app = logged_in().await;
    let member = create_member(&mut app, "Rita").await;
    let uri = format!("/api/team/{}", member["id"]);

    let (status, _) = app.patch(&uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.patch(&uri, json!({ "email": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_unknown_member_is_not_found() {
    let mut app = logged_in().await;

    let (status, body) = app
        .patch("/api/team/4242", json!({ "name": "Ghost" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "team member not found");
}

#[tokio::test]
async fn test_soft_deleted_member_disappears() {
    let mut app = logged_in().await;
    let kept = create_member(&mut app, "Kept").await;
    let gone = create_member(&mut app, "Gone").await;
    let uri = format!("/api/team/{}", gone["id"]);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = app.get("/api/team").await;
    assert_eq!(ids(&list), vec![kept["id"].as_i64().unwrap_or_default()]);

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.patch(&uri, json!({ "name": "Back" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let mut app = logged_in().await;

    let (status, _) = app.get("/api/team/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
