// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod auth_tests;
mod invitation_tests;
mod questionnaire_tests;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use intake_api::{EngineConfig, LifecycleEngine};
use intake_notify::{MemoryTransport, Notifier};
use intake_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const PASSWORD: &str = "correct horse 42";

pub struct TestApp {
    pub router: Router,
    pub engine: Arc<LifecycleEngine<MemoryTransport>>,
}

impl TestApp {
    pub fn new() -> Self {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let engine = Arc::new(LifecycleEngine::new(
            Arc::new(Mutex::new(persistence)),
            Notifier::new(MemoryTransport::new()).unwrap(),
            EngineConfig {
                public_url: String::from("https://intake.example.com"),
                invitation_expiry_days: 30,
            },
        ));
        let router: Router = build_router(
            AppState {
                engine: Arc::clone(&engine),
            },
            Duration::from_secs(10),
        );
        Self { router, engine }
    }

    pub fn transport(&self) -> &MemoryTransport {
        self.engine.notifier().transport()
    }

    /// Sends a request and returns the status and the JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Signs up and logs in, returning the session token.
    pub async fn sign_in(&self, email: &str, role: &str, organization: Option<&str>) -> String {
        let (status, _) = self
            .send(
                "POST",
                "/auth/signup",
                None,
                Some(json!({
                    "email": email,
                    "display_name": "Test Account",
                    "password": PASSWORD,
                    "role": role,
                    "organization_name": organization,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["session_token"].as_str().unwrap().to_string()
    }

    pub async fn sign_in_employer(&self) -> String {
        self.sign_in("hr@acme.example", "employer", Some("Acme Corp"))
            .await
    }

    /// Creates a case for Jane and returns the response body.
    pub async fn create_case(&self, session: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/cases",
                Some(session),
                Some(json!({
                    "employee_name": "Jane Doe",
                    "employee_email": "jane@example.com",
                    "job_title": "Software Engineer",
                    "case_type": "new_employment",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    /// Extracts the questionnaire token from the latest email.
    pub fn last_email_token(&self) -> String {
        let sent = self.transport().sent();
        let message = sent.last().expect("an email was sent");
        let marker = "/questionnaire/";
        let start = message.text.find(marker).expect("link in email") + marker.len();
        message.text[start..start + 64].to_string()
    }
}
