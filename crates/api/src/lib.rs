// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the petition intake system.
//!
//! This crate hosts the invitation [`LifecycleEngine`], the account
//! services and the request/response types. It translates every lower
//! layer error into an [`ApiError`] so that HTTP clients never see
//! internal error text.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod lifecycle;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedAccount, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    create_case, create_invitation, create_petition, get_employee_questionnaire,
    get_questionnaire, list_invitations, login, logout, resend_invitation,
    save_employee_questionnaire, save_questionnaire, signup, whoami,
};
pub use lifecycle::{
    EngineConfig, FetchedQuestionnaire, InvitationOutcome, LifecycleEngine, SubjectDetails,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    CreateCaseRequest, CreateInvitationRequest, CreatePetitionRequest, CreateSubjectResponse,
    InvitationInfo, InvitationResponse, ListInvitationsQuery, ListInvitationsResponse,
    LoginRequest, LoginResponse, QuestionnaireView, ResponseInfo, SaveProgressRequest,
    SignupRequest, SignupResponse, WhoAmIResponse,
};
