//! Storage layer for littlelemon.
//!
//! This module provides the `SQLite`-backed menu cache. The cache is filled
//! once from the remote feed and read from then on, so the store only needs
//! to append, list and filter.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::menu::{Category, MenuItem};

/// Path reported for in-memory databases.
const MEMORY_PATH: &str = ":memory:";

/// A menu store handle shared between async tasks.
pub type SharedMenuStore = Arc<Mutex<MenuStore>>;

/// Open a `SQLite` connection at `path`, creating parent directories first.
pub(crate) fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    debug!("Opening database at {}", path.display());
    let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
        path: path.to_path_buf(),
        source,
    })?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
    Ok(conn)
}

/// Open an in-memory `SQLite` connection.
pub(crate) fn open_memory_connection() -> Result<Connection> {
    Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
        path: PathBuf::from(MEMORY_PATH),
        source,
    })
}

/// On-device cache of menu items.
///
/// The handle owns its connection; open it once at startup and pass it
/// (usually as a [`SharedMenuStore`]) to whatever needs menu data.
#[derive(Debug)]
pub struct MenuStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl MenuStore {
    /// Open or create a menu database at the given path.
    ///
    /// The schema is not touched; call [`MenuStore::ensure_schema`] before
    /// reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the database cannot be
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_connection(&path)?;
        info!("Menu database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store, used by tests and dry runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn: open_memory_connection()?,
        })
    }

    /// Wrap the store for sharing between tasks.
    #[must_use]
    pub fn into_shared(self) -> SharedMenuStore {
        Arc::new(Mutex::new(self))
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the menu table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be written.
    pub fn ensure_schema(&self) -> Result<()> {
        migrations::ensure_schema(&self.conn)
    }

    /// Every stored item, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the schema is missing.
    pub fn read_all(&self) -> Result<Vec<MenuItem>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT name, price, description, image, category
            FROM menu ORDER BY id
            ",
        )?;

        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Read {} menu items", items.len());
        Ok(items)
    }

    /// Append `items` as new rows.
    ///
    /// The batch is one transaction: either every row lands or none does.
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; the store is left unchanged.
    pub fn write_many(&mut self, items: &[MenuItem]) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO menu (name, price, description, image, category)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )?;
            for item in items {
                stmt.execute(params![
                    item.name,
                    item.price,
                    item.description,
                    item.image,
                    item.category.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        debug!("Wrote {} menu items", items.len());
        Ok(items.len())
    }

    /// Items whose name contains `query` (case-sensitive) and whose category
    /// is one of `categories`.
    ///
    /// An empty `query` matches every name. An empty `categories` slice
    /// matches nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn query_by_text_and_categories(
        &self,
        query: &str,
        categories: &[Category],
    ) -> Result<Vec<MenuItem>> {
        if categories.is_empty() {
            debug!("No categories requested, returning no menu items");
            return Ok(Vec::new());
        }

        let placeholders = (2..categories.len() + 2)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r"
            SELECT name, price, description, image, category
            FROM menu
            WHERE instr(name, ?1) > 0 AND category IN ({placeholders})
            ORDER BY id
            "
        );

        let values: Vec<&str> = std::iter::once(query)
            .chain(categories.iter().map(|c| c.as_str()))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(values), Self::row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Query {:?} over {} categories matched {} items",
            query,
            categories.len(),
            items.len()
        );
        Ok(items)
    }

    /// Count stored items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Close the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, source)| Error::DatabaseClose { path, source })
    }

    #[cfg(test)]
    pub(crate) fn execute_batch_for_tests(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Convert a database row to a `MenuItem`.
    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<MenuItem> {
        let name: Option<String> = row.get(0)?;
        let price: Option<f64> = row.get(1)?;
        let description: Option<String> = row.get(2)?;
        let image: Option<String> = row.get(3)?;
        let category_str: Option<String> = row.get(4)?;

        let category = category_str
            .unwrap_or_default()
            .parse::<Category>()
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;

        Ok(MenuItem {
            name: name.unwrap_or_default(),
            price: price.unwrap_or_default(),
            description: description.unwrap_or_default(),
            image: image.unwrap_or_default(),
            category,
        })
    }
}
