//! Database module
//!
//! Handles the SQLite product store and its migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
