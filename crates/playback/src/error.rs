// crates/playback/src/error.rs

use thiserror::Error;

/// Errors surfaced by the playback engine collaborator
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the durable progress store collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Errors surfaced by the coordinator command surface
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid book: {0}")]
    InvalidBook(#[from] fablecast_core::CoreError),
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
