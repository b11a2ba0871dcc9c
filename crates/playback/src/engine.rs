//! Playback engine collaborator boundary

use crate::error::EngineResult;
use tokio::sync::mpsc;

/// Engine-originated notifications, converted from push callbacks into
/// a single inbound event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback started or stopped on the engine side
    PlayingChanged(bool),
    /// Speed changed on the engine side
    SpeedChanged(f32),
    /// The engine moved to a different underlying track
    TrackTransition { position_ms: u64, duration_ms: u64 },
    /// Terminal state: content finished playing
    Ended,
}

/// Interface to the external audio playback engine
///
/// The engine owns decode and transport; this layer only issues
/// commands and reads state. Every read is a single bounded call.
/// Implementations publish [`EngineEvent`]s on the channel returned by
/// [`subscribe`](PlaybackEngine::subscribe).
pub trait PlaybackEngine: Send + Sync {
    /// Establishes a connection to the engine
    fn connect(&self) -> EngineResult<()>;

    /// Releases the connection
    fn disconnect(&self);

    fn play(&self) -> EngineResult<()>;

    fn pause(&self) -> EngineResult<()>;

    fn seek_to(&self, position_ms: u64) -> EngineResult<()>;

    fn set_speed(&self, speed: f32) -> EngineResult<()>;

    /// Current playback position in milliseconds
    fn position_ms(&self) -> EngineResult<u64>;

    /// Total content duration in milliseconds
    fn duration_ms(&self) -> EngineResult<u64>;

    fn is_playing(&self) -> EngineResult<bool>;

    fn speed(&self) -> EngineResult<f32>;

    /// Opens a channel carrying engine-originated events
    fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent>;
}
