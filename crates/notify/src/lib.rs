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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Email notification adapter.
//!
//! A [`Notifier`] renders the invitation, reminder and welcome emails and
//! hands them to an [`EmailTransport`]. Transports are swappable: the
//! console transport logs the envelope for local development, the HTTP
//! transport posts to a JSON email API, and the memory transport keeps
//! messages for inspection.

mod error;
mod message;
mod notifier;
mod templates;
mod transport;

pub use error::NotificationError;
pub use message::EmailMessage;
pub use notifier::{InvitationContext, Notifier};
pub use transport::{
    ConsoleTransport, DEFAULT_EMAIL_TIMEOUT, EmailTransport, HttpTransport, MemoryTransport,
    Transport,
};
