//! `SQLite` schema definitions for littlelemon.
//!
//! This module contains the SQL statements for creating the menu cache and
//! the session key-value table.

/// SQL statement to create the menu table.
pub const CREATE_MENU_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS menu (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT,
    price REAL,
    description TEXT,
    image TEXT,
    category TEXT
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// SQL statement to create the session table.
pub const CREATE_SESSION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS session (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Menu database schema statements in order.
pub const MENU_SCHEMA_STATEMENTS: &[&str] = &[CREATE_MENU_TABLE, CREATE_METADATA_TABLE];
