// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised while rendering or delivering an email.
///
/// Callers treat every variant as non-fatal to the operation that
/// triggered the email.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Failed to render email template: {0}")]
    Template(#[from] tera::Error),

    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider rejected the message with status {status}")]
    Rejected { status: u16 },

    #[error("Email transport is not configured: {0}")]
    Configuration(String),

    #[error("Email transport unavailable: {0}")]
    Unavailable(String),
}
