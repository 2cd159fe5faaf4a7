//! Lingo Types - Pure type definitions
//!
//! Plain data records shared by the core and the HTTP server. Nothing in
//! this crate talks to a database or a runtime.

pub mod page;
pub mod translation;
pub mod user;

pub use page::*;
pub use translation::*;
pub use user::*;
