//! Playback coordination core for Fablecast
//!
//! Keeps a single authoritative view of what is playing and where,
//! synchronized across the playback engine, the UI, the durable
//! progress store and the notification trigger. The engine, store and
//! notifier are collaborator traits injected into the
//! [`PlaybackCoordinator`]; this crate decides when and with what
//! values they are invoked, nothing more.

pub mod chapters;
mod config;
mod controller;
mod coordinator;
mod engine;
mod error;
mod notifier;
mod persister;
mod sampler;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use config::CoordinatorConfig;
pub use controller::ConnectionPhase;
pub use coordinator::PlaybackCoordinator;
pub use engine::{EngineEvent, PlaybackEngine};
pub use error::{
    CoordinatorError, CoordinatorResult, EngineError, EngineResult, StoreError,
};
pub use notifier::SessionNotifier;
pub use persister::ProgressStore;
pub use state::PlaybackState;
pub use fablecast_core::{Audiobook, BookId, Chapter, ProgressRecord, SourceLocator, Validator};
