// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo and tool invocations used locally and in CI.
//!
//! - `cargo xtask ci` — lint, dependency checks, build, test, migration check
//! - `cargo xtask verify-migrations` — applies, reverts and re-applies the
//!   `SQLite` migrations against a throwaway in-memory database and checks
//!   the resulting schema
//!
//! No step needs external infrastructure.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Apply, revert and re-apply the migrations and check the schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown)
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("markdownlint reported issues: {err}");
    }
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2)
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target", "!examples").run_with_trace()?;
    Ok(())
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run lib tests, then doc tests
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Tables the store adapters read and write.
const REQUIRED_TABLES: [&str; 6] = [
    "accounts",
    "cases",
    "invitations",
    "petitions",
    "questionnaire_responses",
    "sessions",
];

/// Single-column uniqueness the store relies on, as (table, column).
const REQUIRED_UNIQUE: [(&str, &str); 4] = [
    ("accounts", "email"),
    ("sessions", "session_token"),
    ("invitations", "invitation_token"),
    ("questionnaire_responses", "invitation_id"),
];

/// Verify the `SQLite` migrations
///
/// 1. Applies every migration to a fresh in-memory database
/// 2. Checks the required tables, unique columns and subject references
/// 3. Reverts every migration and checks that no table is left behind
/// 4. Re-applies and checks that the schema matches the first pass
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    let applied = introspect_schema(&mut conn)?;
    tracing::info!(tables = applied.tables.len(), "Migrations applied");

    check_required_schema(&applied)?;

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let reverted = introspect_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        let leftover: Vec<&str> = reverted.tables.keys().map(String::as_str).collect();
        return Err(eyre!(
            "Down migrations left tables behind: {}",
            leftover.join(", ")
        ));
    }
    tracing::info!("Migrations reverted cleanly");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to re-apply migrations: {e}"))?;
    let reapplied = introspect_schema(&mut conn)?;
    if reapplied != applied {
        return Err(eyre!(
            "Schema after re-applying migrations differs from the first pass:\n{}",
            describe_difference(&applied, &reapplied).join("\n")
        ));
    }

    tracing::info!("Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Table {
    /// Column name to (normalized type, nullable).
    columns: BTreeMap<String, (String, bool)>,
    primary_keys: BTreeSet<String>,
    /// (column, referenced table)
    foreign_keys: BTreeSet<(String, String)>,
    unique_columns: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
}

#[derive(QueryableByName)]
struct IndexRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    unique: i32,
}

/// Reads tables, columns, keys and indexes through `PRAGMA` queries
fn introspect_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    let names: Vec<NameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list tables")?;

    let mut tables: BTreeMap<String, Table> = BTreeMap::new();
    for NameRow { name } in names {
        let mut table = Table::default();

        let columns: Vec<ColumnRow> = diesel::sql_query(format!("PRAGMA table_info({name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read columns of {name}"))?;
        for column in columns {
            if column.pk > 0 {
                table.primary_keys.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                (normalize_type(&column.r#type), column.notnull == 0),
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read foreign keys of {name}"))?;
        table.foreign_keys = foreign_keys
            .into_iter()
            .map(|fk| (fk.from, fk.table))
            .collect();

        let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read indexes of {name}"))?;
        for index in indexes {
            let columns: Vec<String> =
                diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                    .load::<NameRow>(conn)
                    .wrap_err_with(|| format!("Failed to read index {}", index.name))?
                    .into_iter()
                    .map(|row| row.name)
                    .collect();
            if index.unique == 1 {
                table.unique_columns.insert(columns);
            } else {
                table.indexes.insert(columns);
            }
        }

        tables.insert(name, table);
    }

    Ok(Schema { tables })
}

/// Maps `SQLite` declared types onto their storage class
fn normalize_type(declared: &str) -> String {
    let upper = declared.to_uppercase();
    let class = if upper.contains("INT") {
        "integer"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else if upper.contains("BLOB") {
        "blob"
    } else {
        "text"
    };
    class.to_string()
}

/// Checks the tables, unique columns and subject references the store
/// adapters depend on
fn check_required_schema(schema: &Schema) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    for table in REQUIRED_TABLES {
        if !schema.tables.contains_key(table) {
            errors.push(format!("  - missing table '{table}'"));
        }
    }

    for (table, column) in REQUIRED_UNIQUE {
        let unique = schema
            .tables
            .get(table)
            .is_some_and(|t| t.unique_columns.contains(&vec![column.to_string()]));
        if !unique {
            errors.push(format!("  - '{table}.{column}' is not unique"));
        }
    }

    // Invitations and responses point at exactly one of a case or a petition.
    for table in ["invitations", "questionnaire_responses"] {
        let Some(t) = schema.tables.get(table) else {
            continue;
        };
        for (column, target) in [("case_id", "cases"), ("petition_id", "petitions")] {
            let references = t
                .foreign_keys
                .contains(&(column.to_string(), target.to_string()));
            let nullable = t.columns.get(column).is_some_and(|(_, nullable)| *nullable);
            if !references || !nullable {
                errors.push(format!(
                    "  - '{table}.{column}' must be a nullable reference to '{target}'"
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(eyre!("Schema check failed:\n{}", errors.join("\n")))
    }
}

/// Lists the tables whose definition differs between two schemas
fn describe_difference(before: &Schema, after: &Schema) -> Vec<String> {
    let names: BTreeSet<&String> = before.tables.keys().chain(after.tables.keys()).collect();
    names
        .into_iter()
        .filter_map(|name| match (before.tables.get(name), after.tables.get(name)) {
            (Some(a), Some(b)) if a == b => None,
            (Some(a), Some(b)) => Some(format!("  - '{name}': {a:?} != {b:?}")),
            (Some(_), None) => Some(format!("  - '{name}' missing after re-apply")),
            (None, _) => Some(format!("  - '{name}' only present after re-apply")),
        })
        .collect()
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
