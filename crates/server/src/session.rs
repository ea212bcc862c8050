// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! This module provides the Axum extractor that validates a bearer session
//! token and resolves it to the signed-in account.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use intake_api::{AuthenticatedAccount, AuthenticationService};
use intake_notify::EmailTransport;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for signed-in accounts.
///
/// Validates `Authorization: Bearer <token>` and yields the account
/// together with the raw session token (needed for logout).
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionAccount(account, _token): SessionAccount,
/// ) -> Result<Json<Response>, HttpError> {
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing or malformed, or the
/// session is unknown or expired.
pub struct SessionAccount(pub AuthenticatedAccount, pub String);

impl<T: EmailTransport + 'static> FromRequestParts<AppState<T>> for SessionAccount {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<T>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header does not carry a bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        let mut persistence = state.engine.persistence().lock().await;
        let account: AuthenticatedAccount =
            AuthenticationService::validate_session(&mut persistence, token, OffsetDateTime::now_utc())
                .map_err(|e| {
                    debug!(error = %e, "Session validation failed");
                    SessionError::InvalidSession
                })?;

        debug!(
            account_id = account.account_id,
            role = %account.role,
            "Session validated"
        );

        Ok(Self(account, token.to_string()))
    }
}

/// Session extraction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The session is unknown or expired.
    InvalidSession,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: &str = match self {
            Self::MissingAuthorizationHeader => "Missing Authorization header",
            Self::InvalidAuthorizationHeader => {
                "Invalid Authorization header format. Expected: 'Bearer <token>'"
            }
            Self::InvalidSession => "Session is invalid or has expired",
        };

        HttpError {
            status: StatusCode::UNAUTHORIZED,
            kind: "unauthenticated",
            message: message.to_string(),
        }
        .into_response()
    }
}
