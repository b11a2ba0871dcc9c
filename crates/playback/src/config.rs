//! Coordinator configuration

use std::time::Duration;

/// Configuration for the playback coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Period between engine position samples
    pub sample_period: Duration,
    /// Debounce window for persisted progress writes
    pub debounce_window: Duration,
    /// Offset applied by skip_forward
    pub skip_forward_ms: u64,
    /// Offset applied by skip_backward
    pub skip_backward_ms: u64,
    /// Progress fraction at which a book counts as completed
    pub completion_threshold: f64,
    /// Minimum play interval that counts as a listening session
    pub min_session: Duration,
    /// Lower bound for playback speed
    pub min_speed: f32,
    /// Upper bound for playback speed
    pub max_speed: f32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            sample_period: Duration::from_millis(500),
            debounce_window: Duration::from_millis(500),
            skip_forward_ms: 30_000,
            skip_backward_ms: 15_000,
            completion_threshold: 0.98,
            min_session: Duration::from_secs(60),
            min_speed: 0.5,
            max_speed: 2.0,
        }
    }
}
