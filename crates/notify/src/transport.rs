// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::NotificationError;
use crate::message::EmailMessage;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for a single email API request.
pub const DEFAULT_EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers rendered email messages.
pub trait EmailTransport: Send + Sync {
    /// Delivers a message.
    ///
    /// # Errors
    ///
    /// Returns a `NotificationError` if the message could not be delivered.
    fn send(
        &self,
        message: &EmailMessage,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Logs the envelope of each message instead of delivering it.
///
/// Used for local development. The body is not logged because it carries
/// the questionnaire link.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport;

impl EmailTransport for ConsoleTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            text_len = message.text.len(),
            "Email delivered to console transport"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct ApiPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Posts messages as JSON to an HTTP email API with bearer authentication.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpTransport {
    /// Creates a new HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Endpoint that accepts `{from, to, subject, html, text}`
    /// * `api_key` - Bearer token for the endpoint
    /// * `from` - Sender address
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is blank or the HTTP client
    /// cannot be built.
    pub fn new(
        api_url: &str,
        api_key: &str,
        from: &str,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        if api_url.trim().is_empty() {
            return Err(NotificationError::Configuration(String::from(
                "email API URL is required",
            )));
        }
        if api_key.trim().is_empty() {
            return Err(NotificationError::Configuration(String::from(
                "email API key is required",
            )));
        }
        if from.trim().is_empty() {
            return Err(NotificationError::Configuration(String::from(
                "sender address is required",
            )));
        }

        let client: reqwest::Client = reqwest::Client::builder().timeout(timeout).build()?;
        debug!(api_url = %api_url, "HttpTransport initialized");

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_url", &self.api_url)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl EmailTransport for HttpTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let payload: ApiPayload<'_> = ApiPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        debug!(to = %message.to, "Sending email via HTTP API");

        let response: reqwest::Response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .inspect_err(|e| warn!(to = %message.to, error = %e, "Email API request failed"))?;

        let status: reqwest::StatusCode = response.status();
        if status.is_success() {
            debug!(to = %message.to, "Email accepted by provider");
            Ok(())
        } else {
            warn!(
                to = %message.to,
                status_code = %status,
                "Email provider rejected message"
            );
            Err(NotificationError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Keeps delivered messages in memory.
///
/// Used by tests to inspect what would have been sent, and to simulate a
/// failing provider.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of every message delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EmailTransport for MemoryTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::Unavailable(String::from(
                "memory transport is set to fail",
            )));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

/// The transports selectable from configuration.
#[derive(Debug, Clone)]
pub enum Transport {
    Console(ConsoleTransport),
    Http(HttpTransport),
}

impl EmailTransport for Transport {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        match self {
            Self::Console(transport) => transport.send(message).await,
            Self::Http(transport) => transport.send(message).await,
        }
    }
}
