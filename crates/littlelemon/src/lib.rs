//! `littlelemon` - Local-first menu browser and guest session for the Little
//! Lemon restaurant
//!
//! The menu is cached in SQLite and filled from the remote catalog the first
//! time it is empty. Search and category filters are answered from the cache.
//! A small key-value store keeps the signed-in guest's session and profile.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod logging;
pub mod menu;
pub mod profile;
pub mod session;
pub mod storage;
pub mod validation;
pub mod viewmodel;

pub use app::AppContext;
pub use config::Config;
pub use error::{Error, Result};
pub use feed::{HttpMenuFeed, MenuFeed};
pub use logging::init_logging;
pub use menu::{Category, FilterSelection, MenuItem};
pub use profile::ProfileData;
pub use session::SessionStore;
pub use storage::{MenuStore, SharedMenuStore};
pub use viewmodel::MenuViewModel;
