// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or through its `INTAKE_*`
//! environment variable. [`Args::validate`] runs before anything binds.

use clap::{Parser, ValueEnum};
use intake_api::EngineConfig;
use std::time::Duration;

/// Which email transport to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmailProvider {
    /// Log the envelope of each email instead of sending it.
    Console,
    /// Post each email to a JSON email API.
    Http,
}

/// Petition intake server - invitation and questionnaire service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "INTAKE_DATABASE")]
    pub database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "INTAKE_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "INTAKE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Public base URL used to build questionnaire links
    #[arg(long, env = "INTAKE_PUBLIC_URL", default_value = "http://localhost:3000")]
    pub public_url: String,

    /// Days an invitation stays usable after it is created
    #[arg(long, env = "INTAKE_INVITATION_EXPIRY_DAYS", default_value_t = 30)]
    pub invitation_expiry_days: u16,

    /// Email transport
    #[arg(long, env = "INTAKE_EMAIL_PROVIDER", value_enum, default_value_t = EmailProvider::Console)]
    pub email_provider: EmailProvider,

    /// Email API endpoint (http provider)
    #[arg(long, env = "INTAKE_EMAIL_API_URL")]
    pub email_api_url: Option<String>,

    /// Email API bearer key (http provider)
    #[arg(long, env = "INTAKE_EMAIL_API_KEY", hide_env_values = true)]
    pub email_api_key: Option<String>,

    /// Sender address for outgoing email
    #[arg(long, env = "INTAKE_EMAIL_FROM", default_value = "no-reply@localhost")]
    pub email_from: String,

    /// Timeout for each HTTP request and each email API call, in seconds
    #[arg(long, env = "INTAKE_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,
}

/// Settings for the HTTP email transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEmailSettings {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

/// Validated server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database: Option<String>,
    pub bind_address: String,
    pub engine: EngineConfig,
    /// `None` selects the console transport.
    pub http_email: Option<HttpEmailSettings>,
    pub request_timeout: Duration,
}

/// Configuration errors detected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required option is missing.
    Missing(&'static str),
    /// An option has an unusable value.
    Invalid {
        option: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(option) => write!(f, "Missing required option --{option}"),
            Self::Invalid { option, reason } => write!(f, "Invalid --{option}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Args {
    /// Checks option combinations and builds the server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the http provider lacks its URL or key, the
    /// expiry is zero, the timeout is zero, or the public URL is not http(s).
    pub fn validate(self) -> Result<ServerConfig, ConfigError> {
        if self.invitation_expiry_days == 0 {
            return Err(ConfigError::Invalid {
                option: "invitation-expiry-days",
                reason: String::from("must be at least 1"),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                option: "request-timeout-secs",
                reason: String::from("must be at least 1"),
            });
        }

        let public_url: &str = self.public_url.trim().trim_end_matches('/');
        if !(public_url.starts_with("http://") || public_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                option: "public-url",
                reason: String::from("must start with http:// or https://"),
            });
        }

        let http_email: Option<HttpEmailSettings> = match self.email_provider {
            EmailProvider::Console => None,
            EmailProvider::Http => Some(HttpEmailSettings {
                api_url: non_blank(self.email_api_url, "email-api-url")?,
                api_key: non_blank(self.email_api_key, "email-api-key")?,
                from: non_blank(Some(self.email_from), "email-from")?,
            }),
        };

        Ok(ServerConfig {
            database: self.database,
            bind_address: format!("{}:{}", self.bind.trim(), self.port),
            engine: EngineConfig {
                public_url: public_url.to_string(),
                invitation_expiry_days: self.invitation_expiry_days,
            },
            http_email,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

fn non_blank(value: Option<String>, option: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(option))
}
