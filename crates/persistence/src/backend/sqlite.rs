// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup for the intake store.
//!
//! Every connection gets foreign keys and a busy timeout before the
//! migrations run. File stores also switch to WAL so that readers do not
//! block the writer.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// How long a statement waits on a locked database before failing.
pub const BUSY_TIMEOUT_MS: u32 = 10_000;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Where an intake store lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Shared-cache in-memory database, one per test or ephemeral server.
    Memory,
    /// Database file on disk.
    File,
}

impl StoreKind {
    fn pragmas(self) -> Vec<String> {
        let mut pragmas: Vec<String> = vec![
            String::from("PRAGMA foreign_keys = ON"),
            format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
        ];
        if self == Self::File {
            pragmas.push(String::from("PRAGMA journal_mode = WAL"));
        }
        pragmas
    }
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Opens a connection, configures it and brings the schema up to date.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, a PRAGMA
/// fails, a migration fails, or foreign keys end up disabled.
pub fn open_store(
    database_url: &str,
    kind: StoreKind,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?kind, "Opening intake store");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    for pragma in kind.pragmas() {
        diesel::sql_query(pragma.as_str())
            .execute(&mut conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))?;
    }

    let applied: usize = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?
        .len();
    if applied > 0 {
        info!(applied, "Applied intake store migrations");
    }

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Fails unless `PRAGMA foreign_keys` is on for this connection.
///
/// Invitations and responses rely on it to reject unknown cases, petitions
/// and invitations.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if it is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}

/// Row id of the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}
