// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! Lookups return `Ok(None)` when the row does not exist. Stored rows that
//! fail to convert back into domain values surface as
//! `PersistenceError::CorruptRow`.

pub mod accounts;
pub mod invitations;
pub mod responses;
pub mod subjects;
