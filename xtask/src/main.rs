// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! - `cargo xtask ci` runs lint, dependency checks, build, tests and
//!   migration verification
//! - `cargo xtask verify-migrations` applies the `SQLite` migrations to an
//!   in-memory database, checks the resulting schema against the Diesel
//!   table definitions in `helpdesk-persistence`, then reverts and
//!   re-applies every migration
//!
//! Nothing here needs external services.

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
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// Diesel table definitions the migrations must agree with.
const DIESEL_SCHEMA: &str = include_str!("../../crates/persistence/src/diesel_schema.rs");

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

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint clippy, docs, formatting, typos and markdown
    #[command(visible_alias = "l")]
    Lint,

    /// Run all tests, doc tests last
    #[command(visible_alias = "t")]
    Test,

    /// Verify the migrations against the Diesel schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Markdown findings are reported but do not fail the run.
fn lint() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])?;
    lint_docs()?;
    run_cargo_nightly(vec!["fmt", "--all", "--check"])?;
    cmd!("typos").run_with_trace()?;
    if let Err(err) = cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target", "!examples")
        .run_with_trace()
    {
        tracing::warn!("markdownlint reported issues: {err}");
    }
    Ok(())
}

/// Builds the docs of every default member with docs.rs flags, warnings denied.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &package.name],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Applies every migration to an in-memory database, compares the result
/// with the `diesel::table!` definitions (types, nullability and primary
/// keys), then reverts everything and applies it again. A revert that leaves
/// tables behind is an error.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    tracing::info!("Migrations applied successfully");

    let migrated: Schema = introspect_sqlite_schema(&mut conn)?;
    let declared: Schema = parse_diesel_schema(DIESEL_SCHEMA)?;
    compare_schemas(&declared, &migrated)?;
    tracing::info!(
        tables = migrated.tables.len(),
        "Migrated schema matches the Diesel table definitions"
    );

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let leftover: Schema = introspect_sqlite_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        return Err(eyre!(
            "Reverting all migrations left tables behind: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        ));
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to re-apply migrations: {e}"))?;
    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

/// Introspect `SQLite` schema, skipping Diesel's bookkeeping table
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        type_: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' \
         ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut schema = Schema::default();
    for table in tables {
        let columns: Vec<ColumnInfo> = diesel::sql_query(format!(
            "SELECT name, type AS type_, \"notnull\", pk FROM pragma_table_info('{}')",
            table.name
        ))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of '{}'", table.name))?;

        let mut entry = Table::default();
        for column in columns {
            let primary: bool = column.pk > 0;
            if primary {
                entry.primary_keys.insert(column.name.clone());
            }
            entry.columns.insert(
                column.name,
                Column {
                    normalized_type: normalize_sqlite_type(&column.type_),
                    nullable: column.notnull == 0 && !primary,
                },
            );
        }
        schema.tables.insert(table.name, entry);
    }

    Ok(schema)
}

/// Parse the `diesel::table!` blocks of a generated schema file
fn parse_diesel_schema(source: &str) -> Result<Schema> {
    let mut schema = Schema::default();
    let mut current: Option<(String, Table)> = None;

    for line in source.lines().map(str::trim) {
        if let Some((name, table)) = current.as_mut() {
            if line == "}" {
                if let Some((name, table)) = current.take() {
                    schema.tables.insert(name, table);
                }
                continue;
            }
            let Some((column, sql_type)) = line.trim_end_matches(',').split_once("->") else {
                continue;
            };
            let sql_type: &str = sql_type.trim();
            let (inner, nullable): (&str, bool) = sql_type
                .strip_prefix("Nullable<")
                .and_then(|t| t.strip_suffix('>'))
                .map_or((sql_type, false), |t| (t, true));
            table.columns.insert(
                column.trim().to_string(),
                Column {
                    normalized_type: normalize_diesel_type(inner)
                        .ok_or_else(|| eyre!("Unknown Diesel type '{inner}' in table '{name}'"))?,
                    nullable,
                },
            );
        } else if let Some((name, keys)) = line
            .strip_suffix('{')
            .map(str::trim)
            .and_then(|head| head.split_once('('))
        {
            if name.contains('!') {
                continue;
            }
            let keys: &str = keys.trim_end_matches(')');
            let table = Table {
                primary_keys: keys.split(',').map(|k| k.trim().to_string()).collect(),
                ..Table::default()
            };
            current = Some((name.trim().to_string(), table));
        }
    }

    if schema.tables.is_empty() {
        return Err(eyre!("No diesel::table! definitions found"));
    }
    Ok(schema)
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    if upper.contains("INT") {
        "integer".to_string()
    } else if upper.contains("CHAR") || upper.contains("TEXT") || upper.contains("CLOB") {
        "text".to_string()
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real".to_string()
    } else {
        upper.to_lowercase()
    }
}

fn normalize_diesel_type(diesel_type: &str) -> Option<String> {
    let normalized: &str = match diesel_type {
        "BigInt" | "Integer" | "SmallInt" | "Bool" => "integer",
        "Text" => "text",
        "Double" | "Float" => "real",
        _ => return None,
    };
    Some(normalized.to_string())
}

fn compare_schemas(declared: &Schema, migrated: &Schema) -> Result<()> {
    let declared_names: BTreeSet<&String> = declared.tables.keys().collect();
    let migrated_names: BTreeSet<&String> = migrated.tables.keys().collect();
    if declared_names != migrated_names {
        return Err(eyre!(
            "❌ Table sets differ\n  Diesel only: {:?}\n  Migrations only: {:?}",
            declared_names.difference(&migrated_names).collect::<Vec<_>>(),
            migrated_names.difference(&declared_names).collect::<Vec<_>>()
        ));
    }

    for (table_name, declared_table) in &declared.tables {
        let Some(migrated_table) = migrated.tables.get(table_name) else {
            continue;
        };

        if declared_table.primary_keys != migrated_table.primary_keys {
            return Err(eyre!(
                "❌ Primary key mismatch for table '{}'\n  Diesel: {:?}\n  Migrations: {:?}",
                table_name,
                declared_table.primary_keys,
                migrated_table.primary_keys
            ));
        }

        for (column_name, declared_column) in &declared_table.columns {
            match migrated_table.columns.get(column_name) {
                None => {
                    return Err(eyre!(
                        "❌ Column '{table_name}.{column_name}' is declared but not migrated"
                    ));
                }
                Some(migrated_column) if migrated_column != declared_column => {
                    return Err(eyre!(
                        "❌ Column '{}.{}' differs\n  Diesel: {:?}\n  Migrations: {:?}",
                        table_name,
                        column_name,
                        declared_column,
                        migrated_column
                    ));
                }
                Some(_) => {}
            }
        }

        for column_name in migrated_table.columns.keys() {
            if !declared_table.columns.contains_key(column_name) {
                return Err(eyre!(
                    "❌ Column '{table_name}.{column_name}' is migrated but missing from the Diesel schema"
                ));
            }
        }
    }

    Ok(())
}

/// Logs a `duct` command before it runs, and again if it fails.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run()
            .inspect_err(|_| tracing::error!("failed to run command: {:?}", self))
    }
}
