// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! Resource behaviour behind the gates:
//!
//! - `test_blog_*`: blog post lifecycle
//! - `test_comment_*`: comments scoped to a post
//! - `test_user_*`: account administration
//! - `test_error_*`: error body shapes
//! - `test_health_*`: liveness and readiness

use std::sync::Arc;

use serde_json::json;

use quill_api::{ApiServerBuilder, Role};
use quill_tests::prelude::*;

// =============================================================================
// Blogs
// =============================================================================

#[tokio::test]
async fn test_blog_lifecycle() {
    let app = TestApp::new();
    let creator = app.token_for(Role::Creator).await;

    let created = app
        .send(
            TestRequest::post(app.path("/blog"))
                .bearer(&creator)
                .json(BlogFixtures::new_blog()),
        )
        .await;
    created
        .assert_status(StatusCode::CREATED)
        .assert_message("Blog created successfully");
    let id = created.id();
    let uri = app.path(&format!("/blog/{}", id));

    let list = app.send(TestRequest::get(app.path("/blog"))).await;
    list.assert_status(StatusCode::OK);
    assert_eq!(list.body.as_array().unwrap().len(), 1);
    assert_eq!(list.body[0]["_id"], id.as_str());

    let fetched = app.send(TestRequest::get(uri.clone())).await;
    fetched.assert_status(StatusCode::OK);
    assert_eq!(fetched.body["blog_subject"], "Spring planting");
    assert!(fetched.body["createdAt"].is_string());

    app.send(
        TestRequest::put(uri.clone())
            .bearer(&creator)
            .json(BlogFixtures::subject_patch("Autumn harvest")),
    )
    .await
    .assert_status(StatusCode::OK)
    .assert_message("Blog updated successfully");

    let updated = app.send(TestRequest::get(uri.clone())).await;
    assert_eq!(updated.body["blog_subject"], "Autumn harvest");
    assert_eq!(updated.body["blog_body"], fetched.body["blog_body"]);

    app.send(TestRequest::delete(uri.clone()).bearer(&creator))
        .await
        .assert_status(StatusCode::OK)
        .assert_message("Blog deleted successfully");

    app.send(TestRequest::get(uri))
        .await
        .assert_error(StatusCode::NOT_FOUND, "blog not found");
}

#[tokio::test]
async fn test_blog_any_authenticated_user_may_create_and_delete() {
    let app = TestApp::new();
    let user = app.token_for(Role::User).await;

    let created = app
        .send(
            TestRequest::post(app.path("/blog"))
                .bearer(&user)
                .json(BlogFixtures::new_blog()),
        )
        .await;
    created.assert_status(StatusCode::CREATED);

    app.send(TestRequest::delete(app.path(&format!("/blog/{}", created.id()))).bearer(&user))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_blog_create_requires_subject_and_body() {
    let app = TestApp::new();
    let token = app.token_for(Role::Creator).await;

    app.send(
        TestRequest::post(app.path("/blog"))
            .bearer(&token)
            .json(json!({ "blog_category": "garden" })),
    )
    .await
    .assert_field_error("blog_subject")
    .assert_field_error("blog_body");
}

#[tokio::test]
async fn test_blog_unknown_and_malformed_ids() {
    let app = TestApp::new();
    let token = app.token_for(Role::Admin).await;

    app.send(TestRequest::get(app.path("/blog/not-an-id")))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let missing = quill_core::BlogId::generate();
    app.send(
        TestRequest::put(app.path(&format!("/blog/{}", missing)))
            .bearer(&token)
            .json(BlogFixtures::subject_patch("x")),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    app.send(TestRequest::delete(app.path(&format!("/blog/{}", missing))).bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new();
    let blog_id = app.create_blog().await;
    let collection = app.path(&format!("/comments/blog/{}", blog_id));
    let commentor = app.token_for(Role::Commentor).await;

    let created = app
        .send(
            TestRequest::post(collection.clone())
                .bearer(&commentor)
                .json(CommentFixtures::new_comment()),
        )
        .await;
    created
        .assert_status(StatusCode::CREATED)
        .assert_message("Comment created successfully");
    assert_eq!(created.body["blogId"], blog_id.as_str());
    let comment_id = created.id();
    let item = format!("{}/{}", collection, comment_id);

    let list = app.send(TestRequest::get(collection.clone())).await;
    list.assert_status(StatusCode::OK);
    assert_eq!(list.body.as_array().unwrap().len(), 1);
    assert_eq!(list.body[0]["comment_body"], "Mine always go in too early.");
    assert_eq!(list.body[0]["blog_id"], blog_id.as_str());

    let admin = app.token_for(Role::Admin).await;
    let updated = app
        .send(
            TestRequest::put(item.clone())
                .bearer(&admin)
                .json(CommentFixtures::body_patch("Moderated")),
        )
        .await;
    updated
        .assert_status(StatusCode::OK)
        .assert_message("Comment updated successfully");
    assert_eq!(updated.body["blogId"], blog_id.as_str());

    let list = app.send(TestRequest::get(collection.clone())).await;
    assert_eq!(list.body[0]["comment_body"], "Moderated");

    app.send(TestRequest::delete(item).bearer(&admin))
        .await
        .assert_status(StatusCode::OK)
        .assert_message("Comment deleted successfully");

    let list = app.send(TestRequest::get(collection)).await;
    assert!(list.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_on_missing_blog() {
    let app = TestApp::new();
    let token = app.token_for(Role::Commentor).await;
    let missing = quill_core::BlogId::generate();

    app.send(
        TestRequest::post(app.path(&format!("/comments/blog/{}", missing)))
            .bearer(&token)
            .json(CommentFixtures::new_comment()),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND, "blog not found");
}

#[tokio::test]
async fn test_comment_requires_body() {
    let app = TestApp::new();
    let blog_id = app.create_blog().await;
    let token = app.token_for(Role::Commentor).await;

    app.send(
        TestRequest::post(app.path(&format!("/comments/blog/{}", blog_id)))
            .bearer(&token)
            .json(json!({ "commenter_name": "Ed" })),
    )
    .await
    .assert_field_error("comment_body");
}

#[tokio::test]
async fn test_comment_scoped_to_its_blog() {
    let app = TestApp::new();
    let first = app.create_blog().await;
    let second = app.create_blog().await;
    let token = app.token_for(Role::Creator).await;

    let created = app
        .send(
            TestRequest::post(app.path(&format!("/comments/blog/{}", first)))
                .bearer(&token)
                .json(CommentFixtures::new_comment()),
        )
        .await;
    created.assert_status(StatusCode::CREATED);

    app.send(
        TestRequest::put(app.path(&format!("/comments/blog/{}/{}", second, created.id())))
            .bearer(&token)
            .json(CommentFixtures::body_patch("moved")),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    let other = app
        .send(TestRequest::get(app.path(&format!("/comments/blog/{}", second))))
        .await;
    assert!(other.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_removed_with_blog() {
    let app = TestApp::new();
    let blog_id = app.create_blog().await;
    let token = app.token_for(Role::Admin).await;
    let collection = app.path(&format!("/comments/blog/{}", blog_id));

    app.send(
        TestRequest::post(collection.clone())
            .bearer(&token)
            .json(CommentFixtures::new_comment()),
    )
    .await
    .assert_status(StatusCode::CREATED);

    app.send(TestRequest::delete(app.path(&format!("/blog/{}", blog_id))).bearer(&token))
        .await
        .assert_status(StatusCode::OK);

    let list = app.send(TestRequest::get(collection)).await;
    list.assert_status(StatusCode::OK);
    assert!(list.body.as_array().unwrap().is_empty());
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_create_is_public_and_hides_secrets() {
    let app = TestApp::new();

    let created = app
        .send(
            TestRequest::post(app.path("/users"))
                .json(UserFixtures::signup_with_role("writer", "User")),
        )
        .await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.body["role"], "User");
    assert_eq!(created.body["user_approved"], false);
    assert!(created.body["user_verify_expires"].is_string());
    assert!(created.body.get("password_hash").is_none());

    let id = created.body["_id"].as_str().unwrap();
    let fetched = app
        .send(TestRequest::get(app.path(&format!("/users/{}", id))))
        .await;
    fetched.assert_status(StatusCode::OK);
    assert_eq!(fetched.body["user_email"], "writer@example.com");
    assert!(fetched.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_user_self_registration_cannot_pick_privileged_role() {
    let app = TestApp::new();

    for path in ["/auth/signup", "/users"] {
        app.send(
            TestRequest::post(app.path(path))
                .json(UserFixtures::signup_with_role("climber", "Admin")),
        )
        .await
        .assert_field_error("role");
    }
    assert_eq!(app.notifier.count(), 0);

    let token = app.token_for(Role::Admin).await;
    let created = app
        .send(TestRequest::post(app.path("/auth/signup")).json(UserFixtures::signup("climber")))
        .await;
    created.assert_status(StatusCode::CREATED);

    let promoted = app
        .send(
            TestRequest::put(app.path(&format!("/users/{}", created.body["_id"].as_str().unwrap())))
                .bearer(&token)
                .json(json!({ "role": "Creator", "user_approved": true })),
        )
        .await;
    promoted.assert_status(StatusCode::OK);
    assert_eq!(promoted.body["role"], "Creator");
}

#[tokio::test]
async fn test_user_duplicates_conflict() {
    let app = TestApp::new();
    let signup = |body| TestRequest::post(app.path("/auth/signup")).json(body);

    app.send(signup(UserFixtures::signup("dup")))
        .await
        .assert_status(StatusCode::CREATED);

    app.send(signup(UserFixtures::signup("dup")))
        .await
        .assert_error(StatusCode::CONFLICT, "email already in use");

    app.send(signup(json!({
        "user_name": "dup",
        "user_email": "other@example.com",
        "user_password": UserFixtures::PASSWORD,
    })))
    .await
    .assert_error(StatusCode::CONFLICT, "username already in use");

    assert_eq!(app.notifier.count(), 1);
}

#[tokio::test]
async fn test_user_validation() {
    let app = TestApp::new();

    app.send(TestRequest::post(app.path("/users")).json(json!({ "user_name": "x" })))
        .await
        .assert_field_error("user_email")
        .assert_field_error("user_password");

    app.send(
        TestRequest::post(app.path("/users"))
            .json(UserFixtures::signup_with_role("bad", "Superuser")),
    )
    .await
    .assert_field_error("role");

    app.send(
        TestRequest::post(app.path("/users")).json(json!({
            "user_name": "long",
            "user_email": "long@example.com",
            "user_password": "p".repeat(73),
        })),
    )
    .await
    .assert_field_error("user_password");
}

#[tokio::test]
async fn test_user_signup_survives_notifier_failure() {
    let notifier = Arc::new(RecordingNotifier::failing());
    let app = TestApp::with_notifier(notifier.clone());

    app.send(TestRequest::post(app.path("/auth/signup")).json(UserFixtures::signup("quiet")))
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn test_user_admin_update_and_delete() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let target = app.seed_user("promote-me", "User", true).await;
    let uri = app.path(&format!("/users/{}", target.id));

    let updated = app
        .send(
            TestRequest::put(uri.clone())
                .bearer(&admin)
                .json(json!({ "role": "Creator", "user_password": "new-password" })),
        )
        .await;
    updated.assert_status(StatusCode::OK);
    assert_eq!(updated.body["role"], "Creator");

    app.login("promote-me", UserFixtures::PASSWORD)
        .await
        .assert_unauthorized("invalid credentials");
    let login = app.login("promote-me", "new-password").await;
    login.assert_status(StatusCode::OK);

    app.send(
        TestRequest::put(uri.clone())
            .bearer(&admin)
            .json(json!({ "role": "Overlord" })),
    )
    .await
    .assert_field_error("role");

    let list = app.send(TestRequest::get(app.path("/users")).bearer(&admin)).await;
    list.assert_status(StatusCode::OK);
    let users = list.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    app.send(TestRequest::delete(uri.clone()).bearer(&admin))
        .await
        .assert_status(StatusCode::OK)
        .assert_message("User deleted successfully");

    app.send(TestRequest::get(uri))
        .await
        .assert_error(StatusCode::NOT_FOUND, "user not found");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_error_invalid_json_body() {
    let app = TestApp::new();

    let response = app
        .send(TestRequest::post(app.path("/auth/login")).raw_json("{not json"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid JSON body"));
}

#[tokio::test]
async fn test_error_unknown_route() {
    let app = TestApp::new();

    app.send(TestRequest::get(app.path("/nothing-here")))
        .await
        .assert_error(StatusCode::NOT_FOUND, "route not found");
}

#[tokio::test]
async fn test_error_custom_base_path() {
    let app = TestApp::with_config(ConfigFixtures::api_config().with_base_path("/v2/"));

    assert_eq!(app.path("/blog"), "/v2/blog");
    app.send(TestRequest::get("/v2/blog"))
        .await
        .assert_status(StatusCode::OK);
    app.send(TestRequest::get("/api/v1/blog"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let health = app.send(TestRequest::get("/health")).await;
    health.assert_status(StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let ready = app.send(TestRequest::get("/ready")).await;
    ready.assert_status(StatusCode::OK);
    assert_eq!(ready.body["ready"], true);
    assert_eq!(ready.body["store"], "memory");
}

#[tokio::test]
async fn test_health_ready_reports_closed_store() {
    let app = TestApp::new();
    app.state.store().close().await;

    let ready = app.send(TestRequest::get("/ready")).await;
    ready.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready.body["ready"], false);

    app.send(TestRequest::get(app.path("/blog")))
        .await
        .assert_error(StatusCode::SERVICE_UNAVAILABLE, "service unavailable");

    app.send(TestRequest::get("/health"))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_health_served_over_tcp() {
    let server = ApiServerBuilder::new()
        .config(ConfigFixtures::api_config())
        .build()
        .unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = rx.await;
    }));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {}", raw);

    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
