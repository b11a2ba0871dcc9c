//! Core domain model for Fablecast
//!
//! Shared types for the playback coordination layer: book and chapter
//! models, persisted progress snapshots, and validation.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{
    Audiobook, BookId, Chapter, ProgressRecord, SourceLocator, Timestamp, Validator,
};
