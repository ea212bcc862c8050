// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `accounts` — Account and session mutations
//! - `subjects` — Case and petition creation
//! - `invitations` — Invitation creation, status and reminder updates
//! - `responses` — Questionnaire response upserts and completion

pub mod accounts;
pub mod invitations;
pub mod responses;
pub mod subjects;

use intake_domain::format_timestamp;
use time::OffsetDateTime;

use crate::error::PersistenceError;

/// Formats a timestamp into its stored text form.
pub(crate) fn timestamp_text(at: OffsetDateTime) -> Result<String, PersistenceError> {
    format_timestamp(at).map_err(|e| PersistenceError::SerializationError(e.to_string()))
}
