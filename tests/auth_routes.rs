mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use serde_json::json;

fn login(email: &str, password: &str, user_type: &str) -> serde_json::Value {
    json!({ "Email": email, "Password": password, "Type": user_type })
}

#[tokio::test]
async fn admin_logging_in_as_user_is_refused() {
    let app = spawn_app().await;
    app.admin_cookie().await;

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("owner@celebrate.test", "correct horse", "user"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.body["error"]["message"],
        "This User is not Authenticated for this Operation"
    );
    assert!(resp.cookie.is_none());
}

#[tokio::test]
async fn login_failures_are_distinguished() {
    let app = spawn_app().await;
    app.admin_cookie().await;

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("nobody@celebrate.test", "correct horse", "admin"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"]["message"], "User not found!");

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("owner@celebrate.test", "wrong", "admin"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"]["message"], "Invalid Email or Password!");
}

#[tokio::test]
async fn check_and_logout_follow_the_server_side_session() {
    let app = spawn_app().await;

    let resp = app.get("/api/admin/auth/check").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let cookie = app.admin_cookie().await;
    let resp = app
        .send(Method::GET, "/api/admin/auth/check", None, Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["authenticated"], true);
    assert_eq!(resp.body["user"]["email"], "owner@celebrate.test");
    assert_eq!(resp.body["user"]["type"], "admin");

    let resp = app
        .send(Method::POST, "/api/admin/logout", None, Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    // the old cookie still decrypts, but its session row is gone
    let resp = app
        .send(Method::GET, "/api/admin/auth/check", None, Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_cookie_is_not_a_session() {
    let app = spawn_app().await;
    app.admin_cookie().await;

    // the old scheme stored the raw user id in the cookie
    let resp = app
        .send(Method::GET, "/api/admin/auth/check", None, Some("admin-token=1"))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_writes_need_a_session() {
    let app = spawn_app().await;

    let resp = app
        .post("/api/admin/category/add", json!({ "CategoryName": "Birthday" }), None)
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"]["code"], "UNAUTHORIZED");

    let resp = app.get("/api/user/fetch").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_admins_register_further_admins() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let resp = app.register(9000000002, "second@celebrate.test", "admin").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .post(
            "/api/admin/auth/register",
            json!({
                "ContactNum": 9000000002i64,
                "Username": "second",
                "Email": "second@celebrate.test",
                "Password": "pw",
                "Type": "admin",
            }),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
    assert_eq!(resp.body["message"], "User Registered Successfully");
}

#[tokio::test]
async fn user_registration_and_login() {
    let app = spawn_app().await;

    let resp = app.register(9876543210, "guest@celebrate.test", "user").await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
    assert_eq!(resp.body["output"]["Type"], "user");
    assert!(resp.body["output"].get("hashed_pass").is_none());

    let resp = app.register(9876543210, "other@celebrate.test", "user").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"]["message"], "User already exists");

    let resp = app
        .post(
            "/api/user/auth/login",
            login("guest@celebrate.test", "correct horse", "user"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["output"]["Email"], "guest@celebrate.test");
    assert!(resp.cookie.is_none());

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("guest@celebrate.test", "correct horse", "user"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_lists_users() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;
    app.register(9876543210, "guest@celebrate.test", "user").await;

    let resp = app
        .send(Method::GET, "/api/user/fetch", None, Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Fetched All Users");
    assert_eq!(resp.body["output"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unrecognised_login_role_follows_the_lookup_order() {
    let app = spawn_app().await;
    app.admin_cookie().await;

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("nobody@celebrate.test", "correct horse", "Admin"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"]["message"], "User not found!");

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("owner@celebrate.test", "wrong", "manager"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"]["message"], "Invalid Email or Password!");

    let resp = app
        .post(
            "/api/admin/auth/login",
            login("owner@celebrate.test", "correct horse", "manager"),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.body["error"]["message"],
        "This User is not Authenticated for this Operation"
    );
    assert!(resp.cookie.is_none());
}

#[tokio::test]
async fn registration_without_role_or_contact_names_them() {
    let app = spawn_app().await;

    let resp = app
        .post(
            "/api/admin/auth/register",
            json!({ "Username": "guest", "Email": "guest@celebrate.test", "Password": "pw" }),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"]["fields"], json!(["ContactNum", "Type"]));
}
