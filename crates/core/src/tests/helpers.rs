// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use intake_domain::{Invitation, InvitationStatus, SubjectRef};
use time::OffsetDateTime;
use time::macros::datetime;

pub const CREATED_AT: OffsetDateTime = datetime!(2026-01-01 12:00:00 UTC);
pub const EXPIRES_AT: OffsetDateTime = datetime!(2026-01-31 12:00:00 UTC);

/// A time comfortably inside the expiry window.
pub const DURING: OffsetDateTime = datetime!(2026-01-10 08:30:00 UTC);

/// A time just past the expiry window.
pub const AFTER: OffsetDateTime = datetime!(2026-01-31 12:00:01 UTC);

pub fn create_test_invitation(status: InvitationStatus) -> Invitation {
    Invitation {
        invitation_id: 42,
        token: String::from("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"),
        subject: SubjectRef::Case(1),
        subject_email: String::from("e@x.com"),
        invitee_name: String::from("Jane Doe"),
        status,
        created_at: CREATED_AT,
        sent_at: None,
        opened_at: None,
        completed_at: None,
        expires_at: EXPIRES_AT,
        reminder_count: 0,
        last_reminder_sent_at: None,
    }
}

pub fn create_sent_invitation() -> Invitation {
    let mut invitation: Invitation = create_test_invitation(InvitationStatus::Sent);
    invitation.sent_at = Some(CREATED_AT);
    invitation
}
