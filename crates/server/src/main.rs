// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use intake_api::{
    ApiError, CreateCaseRequest, CreateInvitationRequest, CreatePetitionRequest,
    CreateSubjectResponse, InvitationResponse, LifecycleEngine, ListInvitationsQuery,
    ListInvitationsResponse, LoginRequest, LoginResponse, QuestionnaireView, ResponseInfo,
    SignupRequest, SignupResponse, WhoAmIResponse, create_case, create_invitation,
    create_petition, get_employee_questionnaire, get_questionnaire, list_invitations, login,
    logout, resend_invitation, save_employee_questionnaire, save_questionnaire, signup, whoami,
};
use intake_domain::AnswerMap;
use intake_notify::{ConsoleTransport, EmailTransport, HttpTransport, Notifier, Transport};
use intake_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::{Args, ServerConfig};
use crate::session::SessionAccount;

/// How often expired sessions are purged.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Application state shared across handlers.
///
/// The engine owns the store handle and the notifier.
struct AppState<T: EmailTransport> {
    engine: Arc<LifecycleEngine<T>>,
}

impl<T: EmailTransport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable error kind, e.g. `expired` or `not_found`.
    kind: String,
    /// Error message.
    message: String,
}

/// Health check response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error kind reported to clients.
    kind: &'static str,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, kind): (StatusCode, &'static str) = match &err {
            ApiError::AuthenticationFailed { .. } => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::InvitationExpired { .. } => (StatusCode::NOT_FOUND, "expired"),
            ApiError::AlreadyCompleted { .. } => (StatusCode::CONFLICT, "already_completed"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    kind: "internal",
                    message: String::from("Something went wrong on our side. Please retry."),
                };
            }
        };

        let message: String = match err {
            ApiError::InvitationExpired { .. } => {
                String::from("This invitation has expired. Ask your employer to resend it.")
            }
            other => other.to_string(),
        };

        Self {
            status,
            kind,
            message,
        }
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Handler for GET `/health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/auth/signup`.
async fn handle_signup<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), HttpError> {
    let response: SignupResponse = signup(&app_state.engine, &req, now()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/auth/login`.
async fn handle_login<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.engine.persistence().lock().await;
    let response: LoginResponse = login(&mut persistence, &req, now())?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, token): SessionAccount,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.engine.persistence().lock().await;
    logout(&mut persistence, &token)?;
    drop(persistence);
    info!(account_id = account.account_id, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/auth/whoami`.
async fn handle_whoami(SessionAccount(account, _): SessionAccount) -> Json<WhoAmIResponse> {
    Json(whoami(&account))
}

/// Handler for POST `/cases`.
///
/// Creates a case and invites its employee.
async fn handle_create_case<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Json(req): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CreateSubjectResponse>), HttpError> {
    let response: CreateSubjectResponse =
        create_case(&app_state.engine, &account, req, now()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/petitions`.
///
/// Creates a petition and invites its employee.
async fn handle_create_petition<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Json(req): Json<CreatePetitionRequest>,
) -> Result<(StatusCode, Json<CreateSubjectResponse>), HttpError> {
    let response: CreateSubjectResponse =
        create_petition(&app_state.engine, &account, req, now()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/invitations`.
async fn handle_create_invitation<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Json(req): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), HttpError> {
    let response: InvitationResponse =
        create_invitation(&app_state.engine, &account, &req, now()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/invitations?case_id=..` or `?petition_id=..`.
async fn handle_list_invitations<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Query(query): Query<ListInvitationsQuery>,
) -> Result<Json<ListInvitationsResponse>, HttpError> {
    let response: ListInvitationsResponse =
        list_invitations(&app_state.engine, &account, &query, now()).await?;
    Ok(Json(response))
}

/// Handler for POST `/invitations/{invitation_id}/resend`.
async fn handle_resend_invitation<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Path(invitation_id): Path<i64>,
) -> Result<Json<InvitationResponse>, HttpError> {
    let response: InvitationResponse =
        resend_invitation(&app_state.engine, &account, invitation_id, now()).await?;
    Ok(Json(response))
}

/// Handler for GET `/questionnaire/{token}`.
async fn handle_get_questionnaire<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    Path(token): Path<String>,
) -> Result<Json<QuestionnaireView>, HttpError> {
    let view: QuestionnaireView = get_questionnaire(&app_state.engine, &token, now()).await?;
    Ok(Json(view))
}

/// Handler for POST `/questionnaire/{token}`.
async fn handle_save_questionnaire<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    Path(token): Path<String>,
    Json(body): Json<AnswerMap>,
) -> Result<Json<ResponseInfo>, HttpError> {
    let response: ResponseInfo =
        save_questionnaire(&app_state.engine, &token, body, now()).await?;
    Ok(Json(response))
}

/// Handler for GET `/employee/questionnaire/{invitation_id}`.
async fn handle_get_employee_questionnaire<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Path(invitation_id): Path<i64>,
) -> Result<Json<QuestionnaireView>, HttpError> {
    let view: QuestionnaireView =
        get_employee_questionnaire(&app_state.engine, &account, invitation_id, now()).await?;
    Ok(Json(view))
}

/// Handler for POST `/employee/questionnaire/{invitation_id}`.
async fn handle_save_employee_questionnaire<T: EmailTransport + 'static>(
    AxumState(app_state): AxumState<AppState<T>>,
    SessionAccount(account, _): SessionAccount,
    Path(invitation_id): Path<i64>,
    Json(body): Json<AnswerMap>,
) -> Result<Json<ResponseInfo>, HttpError> {
    let response: ResponseInfo =
        save_employee_questionnaire(&app_state.engine, &account, invitation_id, body, now())
            .await?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router<T: EmailTransport + 'static>(
    app_state: AppState<T>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/signup", post(handle_signup::<T>))
        .route("/auth/login", post(handle_login::<T>))
        .route("/auth/logout", post(handle_logout::<T>))
        .route("/auth/whoami", get(handle_whoami))
        .route("/cases", post(handle_create_case::<T>))
        .route("/petitions", post(handle_create_petition::<T>))
        .route(
            "/invitations",
            post(handle_create_invitation::<T>).get(handle_list_invitations::<T>),
        )
        .route(
            "/invitations/{invitation_id}/resend",
            post(handle_resend_invitation::<T>),
        )
        .route(
            "/questionnaire/{token}",
            get(handle_get_questionnaire::<T>).post(handle_save_questionnaire::<T>),
        )
        .route(
            "/employee/questionnaire/{invitation_id}",
            get(handle_get_employee_questionnaire::<T>)
                .post(handle_save_employee_questionnaire::<T>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(app_state)
}

/// Builds the configured email transport.
fn build_transport(config: &ServerConfig) -> Result<Transport, Box<dyn std::error::Error>> {
    match &config.http_email {
        None => {
            info!("Using console email transport");
            Ok(Transport::Console(ConsoleTransport))
        }
        Some(settings) => {
            info!(api_url = %settings.api_url, "Using HTTP email transport");
            let transport: HttpTransport = HttpTransport::new(
                &settings.api_url,
                &settings.api_key,
                &settings.from,
                config.request_timeout,
            )?;
            Ok(Transport::Http(transport))
        }
    }
}

/// Periodically deletes expired sessions.
async fn sweep_sessions(persistence: Arc<Mutex<Persistence>>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let result = persistence
            .lock()
            .await
            .delete_expired_sessions(OffsetDateTime::now_utc());
        match result {
            Ok(removed) => debug!(removed, "Expired sessions swept"),
            Err(e) => warn!(error = %e, "Session sweep failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config: ServerConfig = args.validate().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    info!("Initializing petition intake server");

    let persistence: Persistence = if let Some(db_path) = &config.database {
        info!(path = %db_path, "Using file-based database");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));

    let notifier: Notifier<Transport> = Notifier::new(build_transport(&config)?)?;
    let engine: LifecycleEngine<Transport> =
        LifecycleEngine::new(Arc::clone(&persistence), notifier, config.engine.clone());
    let app_state: AppState<Transport> = AppState {
        engine: Arc::new(engine),
    };

    tokio::spawn(sweep_sessions(persistence));

    let app: Router = build_router(app_state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(
        address = %config.bind_address,
        public_url = %config.engine.public_url,
        invitation_expiry_days = config.engine.invitation_expiry_days,
        "Server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
