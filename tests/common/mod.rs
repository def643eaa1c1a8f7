#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use hr_portal_backend::{
    config::{Config, StorageBackend},
    error::Result,
    models::account::{Account, NewAccount, Role},
    policy::lifecycle::TransitionPolicy,
    repository::{AccountRepository, MemoryStore},
    routes::build_router,
    services::notification_service::{Notification, NotificationSink},
    utils::crypto::hash_password,
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "s3cret-passphrase";
pub const BOUNDARY: &str = "----hr-portal-test-boundary";

#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn templates(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.template.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        self.delivered.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub uploads_dir: PathBuf,
}

pub fn test_config(uploads_dir: &PathBuf, transitions: TransitionPolicy) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        storage: StorageBackend::Memory,
        database_url: None,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_ttl_minutes: 60,
        public_rps: 1000,
        trust_forwarded_for: false,
        uploads_dir: uploads_dir.to_string_lossy().to_string(),
        max_resume_bytes: 5 * 1024 * 1024,
        transition_policy: transitions,
        notification_webhook_url: None,
        webhook_secret: None,
        cors_origins: Vec::new(),
        admin_email: None,
        admin_password: None,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(TransitionPolicy::Permissive)
}

pub fn spawn_app_with(transitions: TransitionPolicy) -> TestApp {
    let uploads_dir = std::env::temp_dir().join(format!("hr-portal-uploads-{}", Uuid::new_v4()));
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(
        test_config(&uploads_dir, transitions),
        store.clone(),
        sink.clone(),
    );
    TestApp {
        router: build_router(state.clone()),
        state,
        store,
        sink,
        uploads_dir,
    }
}

impl TestApp {
    pub async fn create_account(&self, email: &str, role: Role) -> Account {
        self.store
            .insert_account(NewAccount {
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).expect("hash"),
                full_name: format!("{} user", role),
                role,
            })
            .await
            .expect("insert account")
    }

    pub fn token_for(&self, account: &Account) -> String {
        self.state
            .tokens
            .issue(account.id, &account.email, account.role)
            .expect("issue token")
            .token
    }

    /// Creates an account with `role` and returns a bearer token for it.
    pub async fn login_as(&self, role: Role) -> String {
        let email = format!("{}-{}@example.com", role.as_str().to_lowercase(), Uuid::new_v4());
        let account = self.create_account(&email, role).await;
        self.token_for(&account)
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, JsonValue) {
        let resp = self.router.clone().oneshot(req).await.expect("router response");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                JsonValue::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, body)
    }

    pub async fn create_job(&self, token: &str) -> JsonValue {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/jobs",
                Some(token),
                Some(json!({
                    "title": "Backend Engineer",
                    "description": "Build and run the hiring platform.",
                    "department": "Engineering",
                    "location": "Remote",
                    "employment_type": "FULL_TIME",
                    "salary_min": "90000",
                    "salary_max": "120000"
                })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    pub async fn apply(&self, job_id: &str, email: &str) -> (StatusCode, JsonValue) {
        self.send(multipart_request(
            "/api/public/applications",
            &[
                ("job_id", job_id),
                ("candidate_name", "Ada Lovelace"),
                ("candidate_email", email),
                ("cover_letter", "I would love to join."),
            ],
            Some(("resume.pdf", b"%PDF-1.7 resume body")),
        ))
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.uploads_dir);
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
