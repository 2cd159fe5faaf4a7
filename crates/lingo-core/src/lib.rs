//! Lingo Core Library
//!
//! Domain logic for the translation service: the store and authentication
//! ports, boundary validation, the search/create/update service and the
//! read-through export cache.

// Re-export pure types from lingo-types
pub use lingo_types::*;

pub mod clock;
pub mod error;
pub mod export;
pub mod memory;
pub mod ports;
pub mod service;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LingoError, Result};
pub use export::{ExportCache, SlotState, DEFAULT_EXPORT_TTL_SECS};
pub use memory::MemoryStore;
pub use service::{TranslationService, PAGE_SIZE};
pub use validation::ValidationErrors;
