mod common;

use common::TestApp;
use common::ACCESS_TTL_SECS;
use common::REFRESH_TTL_SECS;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn login_tokens(app: &TestApp, email: &str, password: &str) -> (String, String) {
    let response = app.login(email, password).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    (
        body["data"]["accessToken"].as_str().unwrap().to_string(),
        body["data"]["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .register("Nicola", "nicola@example.com", "pass_word!")
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["name"], "Nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert!(body["data"]["id"].is_u64());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;
    let response = app
        .register("Someone Else", "nicola@example.com", "another_pass")
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = TestApp::spawn().await;

    let cases = [
        ("", "nicola@example.com", "pass_word!"),
        ("Nicola", "not-an-email", "pass_word!"),
        ("Nicola", "nicola@example.com", "short"),
    ];

    for (name, email, password) in cases {
        let response = app.register(name, email, password).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "name={:?} email={:?}",
            name,
            email
        );
    }
}

#[tokio::test]
async fn test_login_success_returns_token_pair() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app.login("nicola@example.com", "pass_word!").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let access = body["data"]["accessToken"].as_str().unwrap();
    let refresh = body["data"]["refreshToken"].as_str().unwrap();

    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
    assert!(body["data"]["exp"].is_i64());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;

    let wrong_password = app.login("nicola@example.com", "wrong_password").await;
    let unknown_user = app.login("ghost@example.com", "pass_word!").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_body: Value = wrong_password.json().await.unwrap();
    let unknown_body: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({ "email": "nicola@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_current_user_requires_bearer_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users/me")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get_authenticated("/api/users/me", "not-a-token")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user_with_access_token() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;
    let (access, _) = login_tokens(&app, "nicola@example.com", "pass_word!").await;

    let response = app
        .get_authenticated("/api/users/me", &access)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;
    let (access, refresh) = login_tokens(&app, "nicola@example.com", "pass_word!").await;

    let response = app
        .get_authenticated("/api/users/me", &refresh)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.refresh(&access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_refresh_rotates_both_tokens() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;
    let (access, refresh) = login_tokens(&app, "nicola@example.com", "pass_word!").await;

    app.advance_clock(10);

    let response = app.refresh(&refresh).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let new_access = body["data"]["accessToken"].as_str().unwrap();
    let new_refresh = body["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(new_access, access);
    assert_ne!(new_refresh, refresh);

    let response = app
        .get_authenticated("/api/users/me", new_access)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_access_token_can_be_renewed_with_refresh_token() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;
    let (access, refresh) = login_tokens(&app, "nicola@example.com", "pass_word!").await;

    app.advance_clock(ACCESS_TTL_SECS + 1);

    let response = app
        .get_authenticated("/api/users/me", &access)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.refresh(&refresh).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_refresh_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.register("Nicola", "nicola@example.com", "pass_word!")
        .await;
    let (_, refresh) = login_tokens(&app, "nicola@example.com", "pass_word!").await;

    app.advance_clock(REFRESH_TTL_SECS);

    let response = app.refresh(&refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

async fn create_post(app: &TestApp, token: &str, title: &str, content: &str) -> Value {
    let response = app
        .post_authenticated("/api/posts", token)
        .json(&json!({ "title": title, "content": content }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_posts_require_access_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/posts")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post("/api/posts")
        .json(&json!({ "title": "Echo", "content": "Echo is nice!" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_posts() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Nicola", "nicola@example.com").await;

    let body = create_post(&app, &token, "Echo", "Echo is nice!").await;
    assert_eq!(body["data"]["title"], "Echo");
    assert_eq!(body["data"]["content"], "Echo is nice!");
    assert!(body["data"]["id"].is_u64());
    let author_id = body["data"]["author_id"].clone();

    let me: Value = app
        .get_authenticated("/api/users/me", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(author_id, me["data"]["id"]);

    create_post(&app, &token, "Second", "Another one").await;

    let response = app
        .get_authenticated("/api/posts", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Echo");
    assert_eq!(posts[1]["title"], "Second");
}

#[tokio::test]
async fn test_create_post_rejects_blank_fields() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Nicola", "nicola@example.com").await;

    let response = app
        .post_authenticated("/api/posts", &token)
        .json(&json!({ "title": "  ", "content": "Echo is nice!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_author_updates_post() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Nicola", "nicola@example.com").await;
    let created = create_post(&app, &token, "Echo", "Echo is nice!").await;
    let id = created["data"]["id"].as_u64().unwrap();

    let response = app
        .put_authenticated(&format!("/api/posts/{}", id), &token)
        .json(&json!({ "title": "Axum", "content": "Axum is nice too" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = app
        .get_authenticated(&format!("/api/posts/{}", id), &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["title"], "Axum");
    assert_eq!(body["data"]["content"], "Axum is nice too");
}

#[tokio::test]
async fn test_author_deletes_post() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Nicola", "nicola@example.com").await;
    let created = create_post(&app, &token, "Echo", "Echo is nice!").await;
    let id = created["data"]["id"].as_u64().unwrap();

    let response = app
        .delete_authenticated(&format!("/api/posts/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated(&format!("/api/posts/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_cannot_change_a_post() {
    let app = TestApp::spawn().await;
    let author = app.access_token_for("Nicola", "nicola@example.com").await;
    let intruder = app.access_token_for("Mallory", "mallory@example.com").await;
    let created = create_post(&app, &author, "Echo", "Echo is nice!").await;
    let id = created["data"]["id"].as_u64().unwrap();

    let response = app
        .put_authenticated(&format!("/api/posts/{}", id), &intruder)
        .json(&json!({ "title": "Hijacked", "content": "Hijacked" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .delete_authenticated(&format!("/api/posts/{}", id), &intruder)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = app
        .get_authenticated(&format!("/api/posts/{}", id), &author)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["title"], "Echo");
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Nicola", "nicola@example.com").await;

    let response = app
        .put_authenticated("/api/posts/999", &token)
        .json(&json!({ "title": "Echo", "content": "Echo is nice!" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
