// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::NotificationError;
use crate::message::EmailMessage;
use crate::templates;
use crate::transport::EmailTransport;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

/// Values available to the invitation and reminder templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationContext {
    pub invitee_name: String,
    pub employer_name: String,
    /// "case" or "petition" wording, e.g. "new employment petition".
    pub subject_type: String,
    pub job_title: String,
    /// Questionnaire link. Carries the invitation token.
    pub login_url: String,
    /// Human readable expiry date.
    pub expires_on: String,
    /// Changes the subject line and opening paragraph only.
    pub is_reminder: bool,
}

impl InvitationContext {
    fn subject_line(&self) -> String {
        if self.is_reminder {
            format!(
                "Reminder: {} is waiting for your H-1B questionnaire",
                self.employer_name
            )
        } else {
            format!(
                "{} invited you to complete an H-1B questionnaire",
                self.employer_name
            )
        }
    }
}

#[derive(Serialize)]
struct WelcomeContext<'a> {
    name: &'a str,
}

/// Renders and delivers the emails the intake workflow sends.
pub struct Notifier<T: EmailTransport> {
    transport: T,
    templates: Tera,
}

impl<T: EmailTransport> Notifier<T> {
    /// Creates a notifier over a transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in templates fail to load.
    pub fn new(transport: T) -> Result<Self, NotificationError> {
        Ok(Self {
            transport,
            templates: templates::load()?,
        })
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Renders an invitation or reminder email without sending it.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::Template` if rendering fails.
    pub fn render_invitation(
        &self,
        to: &str,
        context: &InvitationContext,
    ) -> Result<EmailMessage, NotificationError> {
        let tera_context: Context = Context::from_serialize(context)?;
        Ok(EmailMessage {
            to: to.to_string(),
            subject: context.subject_line(),
            html: self
                .templates
                .render(templates::INVITATION_HTML, &tera_context)?,
            text: self
                .templates
                .render(templates::INVITATION_TEXT, &tera_context)?,
        })
    }

    /// Sends an invitation (or, with `is_reminder`, a reminder) email.
    ///
    /// # Arguments
    ///
    /// * `to` - Recipient address
    /// * `context` - Template values
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails.
    pub async fn send_invitation(
        &self,
        to: &str,
        context: &InvitationContext,
    ) -> Result<(), NotificationError> {
        let message: EmailMessage = self.render_invitation(to, context)?;
        debug!(to = %to, is_reminder = context.is_reminder, "Sending invitation email");
        self.transport.send(&message).await
    }

    /// Sends the welcome email after signup.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails.
    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<(), NotificationError> {
        let tera_context: Context = Context::from_serialize(WelcomeContext { name })?;
        let message: EmailMessage = EmailMessage {
            to: to.to_string(),
            subject: String::from("Welcome to petition intake"),
            html: self.templates.render(templates::WELCOME_HTML, &tera_context)?,
            text: self.templates.render(templates::WELCOME_TEXT, &tera_context)?,
        };
        debug!(to = %to, "Sending welcome email");
        self.transport.send(&message).await
    }
}
