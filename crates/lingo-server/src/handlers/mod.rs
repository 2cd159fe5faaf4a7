//! HTTP handlers

pub mod auth;
pub mod health;
pub mod translations;
pub mod users;

pub use health::health;
