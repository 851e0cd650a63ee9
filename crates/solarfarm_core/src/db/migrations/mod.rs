//! Schema migrations for the panel store.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing order.
//! - Apply every pending step inside one transaction.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A step may carry a Rust backfill for data SQL cannot derive itself.

use crate::db::{DbError, DbResult};
use crate::model::solar_panel::section_key;
use log::info;
use rusqlite::{Connection, Transaction};

type Backfill = fn(&Transaction<'_>) -> rusqlite::Result<()>;

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
    backfill: Option<Backfill>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
        backfill: None,
    },
    Migration {
        version: 2,
        sql: include_str!("0002_section_key.sql"),
        backfill: Some(fill_section_keys),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        run_step(&tx, migration).map_err(|source| DbError::Migration {
            version: migration.version,
            source,
        })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_step(tx: &Transaction<'_>, migration: &Migration) -> rusqlite::Result<()> {
    tx.execute_batch(migration.sql)?;
    if let Some(backfill) = migration.backfill {
        backfill(tx)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
}

fn fill_section_keys(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    let sections = {
        let mut stmt = tx.prepare("SELECT id, section FROM solar_panel;")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };

    let mut update = tx.prepare("UPDATE solar_panel SET section_key = ?1 WHERE id = ?2;")?;
    for (id, section) in &sections {
        update.execute(rusqlite::params![section_key(section), id])?;
    }
    Ok(())
}
