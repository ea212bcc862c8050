// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp normalization and the storage text format.
//!
//! All timestamps are UTC with microsecond precision and are stored as
//! `YYYY-MM-DDTHH:MM:SS.ffffffZ`. Because every stored value has the same
//! width, lexicographic order equals chronological order.

use crate::error::DomainError;
use crate::types::MAX_INVITATION_EXPIRY_DAYS;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const STORAGE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// Converts a timestamp to UTC and truncates it to whole microseconds.
#[must_use]
pub fn normalize_timestamp(at: OffsetDateTime) -> OffsetDateTime {
    let utc: OffsetDateTime = at.to_offset(UtcOffset::UTC);
    let micros_as_nanos: u32 = (utc.nanosecond() / 1_000) * 1_000;
    utc.replace_nanosecond(micros_as_nanos).unwrap_or(utc)
}

/// Formats a timestamp in the storage format.
///
/// # Errors
///
/// Returns `DomainError::TimestampFormatError` if the year cannot be
/// represented with four digits.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, DomainError> {
    normalize_timestamp(at)
        .format(STORAGE_FORMAT)
        .map_err(|e| DomainError::TimestampFormatError(e.to_string()))
}

/// Parses a timestamp written by [`format_timestamp`].
///
/// # Errors
///
/// Returns `DomainError::TimestampParseError` if the value is not in the
/// storage format.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    PrimitiveDateTime::parse(value, STORAGE_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::TimestampParseError {
            value: value.to_string(),
            error: e.to_string(),
        })
}

/// Computes the expiry time of an invitation created at `created_at`.
///
/// # Arguments
///
/// * `created_at` - The creation time
/// * `expiry_days` - Number of whole days the invitation stays usable
///
/// # Errors
///
/// Returns an error if `expiry_days` is zero or above the permitted
/// maximum, or if the addition overflows.
pub fn invitation_expiry(
    created_at: OffsetDateTime,
    expiry_days: u16,
) -> Result<OffsetDateTime, DomainError> {
    if expiry_days == 0 || expiry_days > MAX_INVITATION_EXPIRY_DAYS {
        return Err(DomainError::InvalidExpiryDays(i64::from(expiry_days)));
    }

    normalize_timestamp(created_at)
        .checked_add(Duration::days(i64::from(expiry_days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {expiry_days} days to invitation creation time"),
        })
}
