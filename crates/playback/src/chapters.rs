//! Chapter resolution and navigation
//!
//! Pure functions over the active book's chapter list. Chapters are
//! expected to be sorted ascending by start time and non-overlapping;
//! if that invariant is violated the first matching chapter in
//! sequence order wins.

use fablecast_core::Chapter;

/// Finds the chapter containing `position_ms`
///
/// A chapter matches when the position is at or past its start and,
/// unless the chapter is open-ended (`end_time_ms == 0`), before its
/// end. Returns None for an empty list or a position before the first
/// chapter start.
pub fn resolve(position_ms: u64, chapters: &[Chapter]) -> Option<&Chapter> {
    chapters.iter().find(|c| c.contains(position_ms))
}

/// Returns the chapter following the one containing `position_ms`
///
/// When the position resolves to no chapter, falls back to the first
/// chapter starting after the position.
pub fn next_after(position_ms: u64, chapters: &[Chapter]) -> Option<&Chapter> {
    match chapters.iter().position(|c| c.contains(position_ms)) {
        Some(idx) => chapters.get(idx + 1),
        None => chapters.iter().find(|c| c.start_time_ms > position_ms),
    }
}

/// Returns the chapter preceding the one containing `position_ms`
pub fn previous_before(position_ms: u64, chapters: &[Chapter]) -> Option<&Chapter> {
    let idx = chapters.iter().position(|c| c.contains(position_ms))?;
    if idx == 0 {
        None
    } else {
        chapters.get(idx - 1)
    }
}
