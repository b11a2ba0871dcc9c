//! Persisted playback progress snapshot

use crate::types::{BookId, Timestamp};
use serde::{Deserialize, Serialize};

/// One durable snapshot of playback progress
///
/// Written by the progress persister and never read back by the
/// coordination layer; the store keeps at most the latest record per
/// book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub book_id: BookId,
    pub position_ms: u64,
    /// Progress fraction in [0, 1]
    pub progress: f64,
    /// Chapter containing the position, when resolvable
    pub chapter_number: Option<u32>,
    pub written_at: Timestamp,
}

impl ProgressRecord {
    /// Creates a record stamped with the current time
    pub fn new(
        book_id: BookId,
        position_ms: u64,
        progress: f64,
        chapter_number: Option<u32>,
    ) -> Self {
        Self {
            book_id,
            position_ms,
            progress,
            chapter_number,
            written_at: Timestamp::now(),
        }
    }
}
