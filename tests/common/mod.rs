#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use axum_extra::extract::cookie::Key;
use celebrate::CelebrateError;
use celebrate::config::Config;
use celebrate::db::MarketStorage;
use celebrate::router::{MarketState, market_router};
use celebrate::service::mailer::{ContactMail, Mailer};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

/// Captures contact mails instead of talking to SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<ContactMail>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn verify(&self) -> Result<(), CelebrateError> {
        if self.fail {
            return Err(CelebrateError::MailError("connection refused".into()));
        }
        Ok(())
    }

    async fn send_contact(&self, mail: &ContactMail) -> Result<(), CelebrateError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub cfg: Config,
    pub mailer: Arc<RecordingMailer>,
    // dropped last: holds the database file and the upload directory
    pub dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<String>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(RecordingMailer::default()).await
}

pub async fn spawn_app_with(mailer: RecordingMailer) -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let mut cfg = Config::default();
    cfg.basic.database_url = format!("sqlite:{}", dir.path().join("celebrate.sqlite").display());
    cfg.basic.bcrypt_cost = 4;
    cfg.basic.insecure_cookie = true;
    cfg.storage.upload_dir = dir.path().join("uploads");

    let storage = MarketStorage::connect(&cfg.basic.database_url)
        .await
        .expect("failed to open test database");
    let mailer = Arc::new(mailer);
    let state = MarketState::new(&cfg, storage, mailer.clone(), Key::generate());

    TestApp {
        app: market_router(state),
        cfg,
        mailer,
        dir,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = resp.status();
        let cookie = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("admin-token="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            cookie,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.send(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn register(&self, contact: i64, email: &str, user_type: &str) -> TestResponse {
        self.post(
            "/api/admin/auth/register",
            json!({
                "ContactNum": contact,
                "Username": email.split('@').next().unwrap_or(email),
                "Email": email,
                "Password": "correct horse",
                "Type": user_type,
            }),
            None,
        )
        .await
    }

    /// Registers the bootstrap admin and returns its session cookie.
    pub async fn admin_cookie(&self) -> String {
        let resp = self.register(9000000001, "owner@celebrate.test", "admin").await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);

        let resp = self
            .post(
                "/api/admin/auth/login",
                json!({
                    "Email": "owner@celebrate.test",
                    "Password": "correct horse",
                    "Type": "admin",
                }),
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
        resp.cookie.expect("login did not set admin-token")
    }

    pub async fn add_category(&self, cookie: &str, name: &str) -> i64 {
        let resp = self
            .post(
                "/api/admin/category/add",
                json!({ "CategoryName": name, "Description": format!("{name} parties") }),
                Some(cookie),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        resp.body["category"]["_id"].as_i64().expect("category id")
    }

    pub async fn add_package(&self, cookie: &str, category_id: i64, name: &str) -> i64 {
        let resp = self
            .post("/api/admin/package/add", package_body(category_id, name), Some(cookie))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        resp.body["package"]["_id"].as_i64().expect("package id")
    }
}

pub fn package_body(category_id: i64, name: &str) -> Value {
    json!({
        "CategoryId": category_id.to_string(),
        "PackageName": name,
        "PackageDesc": "Balloons, cake and a host",
        "Price": "4999",
        "DiscountPrice": "3999",
        "PackageReview": "4.8",
        "Experience": "3 hours",
        "Location": "Pune",
        "Policy": [{ "point": "No refunds within 48 hours" }],
        "NeedToKnow": [{ "name": "Venue access from 10am" }],
    })
}

/// `hello`, wrapped as a data URL the way the admin form sends it.
pub const PNG_DATA_URL: &str = "data:image/png;base64,aGVsbG8=";
