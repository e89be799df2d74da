//! Schema versioning for the menu database.
//!
//! The menu cache carries its schema version in the `metadata` table so a
//! later layout change can be applied in place on devices that already hold
//! a populated cache.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::MENU_SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Create the menu schema if absent and bring it to [`CURRENT_VERSION`].
///
/// Safe to call any number of times.
///
/// # Errors
///
/// Returns an error if a statement fails or the stored version is unreadable.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    for statement in MENU_SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    if version < CURRENT_VERSION {
        debug!("Recording menu schema version {CURRENT_VERSION} (was {version})");
        set_schema_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Read the stored schema version, 0 for a fresh database.
pub(crate) fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
