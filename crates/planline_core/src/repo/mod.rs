//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories refuse to operate on connections whose schema is not at the
//!   expected migrated version.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

use crate::db::migrations::latest_version;
use rusqlite::Connection;

pub mod item_repo;
pub mod order_store;
pub mod project_repo;

/// Outcome of a connection readiness probe, mapped by each repository onto
/// its own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaProbe {
    Ready,
    VersionMismatch {
        expected_version: u32,
        actual_version: u32,
    },
    MissingTable(&'static str),
}

/// Checks that migrations ran and the named tables exist.
pub(crate) fn probe_schema(
    conn: &Connection,
    tables: &[&'static str],
) -> rusqlite::Result<SchemaProbe> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Ok(SchemaProbe::VersionMismatch {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Ok(SchemaProbe::MissingTable(table));
        }
    }

    Ok(SchemaProbe::Ready)
}
