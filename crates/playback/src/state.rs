//! Shared playback state

use fablecast_core::{Audiobook, Chapter};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of the active playback session
///
/// Has exactly one writer (the coordinator's update task); observers
/// receive snapshots through a watch channel and never mutate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
    pub speed: f32,
    pub connected: bool,
    pub current_chapter: Option<Chapter>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            position_ms: 0,
            duration_ms: 0,
            is_playing: false,
            speed: 1.0,
            connected: false,
            current_chapter: None,
        }
    }

    /// Fraction of the content played, clamped to [0, 1]
    ///
    /// Returns 0.0 while the duration is not yet known.
    pub fn progress_fraction(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutations funneled into the coordinator's single update task
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StateUpdate {
    BookLoaded(Arc<Audiobook>),
    Connected(bool),
    /// One-shot full sync performed on connect
    Sync {
        position_ms: u64,
        duration_ms: u64,
        speed: f32,
        is_playing: bool,
    },
    /// Periodic sample or engine-side track transition
    Position { position_ms: u64, duration_ms: u64 },
    /// Explicit seek; the only permitted non-monotonic position change
    Seek { position_ms: u64 },
    Playing(bool),
    Speed(f32),
    Ended,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_new() {
        let state = PlaybackState::new();
        assert_eq!(state.position_ms, 0);
        assert_eq!(state.duration_ms, 0);
        assert!(!state.is_playing);
        assert!(!state.connected);
        assert_eq!(state.speed, 1.0);
        assert!(state.current_chapter.is_none());
    }

    #[test]
    fn test_progress_fraction() {
        let mut state = PlaybackState::new();
        state.duration_ms = 100_000;
        state.position_ms = 50_000;
        assert_eq!(state.progress_fraction(), 0.5);
    }

    #[test]
    fn test_progress_zero_duration() {
        let mut state = PlaybackState::new();
        state.position_ms = 50_000;
        assert_eq!(state.progress_fraction(), 0.0);
    }

    #[test]
    fn test_progress_clamped() {
        let mut state = PlaybackState::new();
        state.duration_ms = 100_000;
        state.position_ms = 150_000;
        assert_eq!(state.progress_fraction(), 1.0);
    }
}
