//! Storage layer
//!
//! Uses SQLite (embedded) for users and translations.

pub mod db;

pub use db::{Database, IN_MEMORY};
