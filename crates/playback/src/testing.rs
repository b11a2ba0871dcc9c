//! In-memory collaborators for unit tests

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::notifier::SessionNotifier;
use crate::persister::ProgressStore;
use fablecast_core::ProgressRecord;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Default)]
struct EngineInner {
    position_ms: u64,
    duration_ms: u64,
    speed: f32,
    playing: bool,
    fail_connect: bool,
    connect_calls: usize,
    disconnect_calls: usize,
    play_calls: usize,
    pause_calls: usize,
    seeks: Vec<u64>,
    speeds: Vec<f32>,
}

/// Scripted engine recording every command it receives
pub(crate) struct MockEngine {
    inner: Mutex<EngineInner>,
    events: Mutex<Vec<mpsc::UnboundedSender<EngineEvent>>>,
}

impl MockEngine {
    pub(crate) fn new(duration_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(EngineInner {
                duration_ms,
                speed: 1.0,
                ..EngineInner::default()
            }),
            events: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        for tx in self.events.lock().unwrap().iter() {
            let _ = tx.send(event.clone());
        }
    }

    pub(crate) fn set_position(&self, position_ms: u64) {
        self.inner.lock().unwrap().position_ms = position_ms;
    }

    pub(crate) fn set_playing(&self, playing: bool) {
        self.inner.lock().unwrap().playing = playing;
    }

    pub(crate) fn set_fail_connect(&self, fail: bool) {
        self.inner.lock().unwrap().fail_connect = fail;
    }

    pub(crate) fn connect_calls(&self) -> usize {
        self.inner.lock().unwrap().connect_calls
    }

    pub(crate) fn disconnect_calls(&self) -> usize {
        self.inner.lock().unwrap().disconnect_calls
    }

    pub(crate) fn play_calls(&self) -> usize {
        self.inner.lock().unwrap().play_calls
    }

    pub(crate) fn pause_calls(&self) -> usize {
        self.inner.lock().unwrap().pause_calls
    }

    pub(crate) fn seeks(&self) -> Vec<u64> {
        self.inner.lock().unwrap().seeks.clone()
    }

    pub(crate) fn speeds(&self) -> Vec<f32> {
        self.inner.lock().unwrap().speeds.clone()
    }
}

impl PlaybackEngine for MockEngine {
    fn connect(&self) -> EngineResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.connect_calls += 1;
        if inner.fail_connect {
            return Err(EngineError::ConnectionFailed("unreachable".to_string()));
        }
        Ok(())
    }

    fn disconnect(&self) {
        self.inner.lock().unwrap().disconnect_calls += 1;
    }

    fn play(&self) -> EngineResult<()> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.play_calls += 1;
            inner.playing = true;
        }
        self.emit(EngineEvent::PlayingChanged(true));
        Ok(())
    }

    fn pause(&self) -> EngineResult<()> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.pause_calls += 1;
            inner.playing = false;
        }
        self.emit(EngineEvent::PlayingChanged(false));
        Ok(())
    }

    fn seek_to(&self, position_ms: u64) -> EngineResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.seeks.push(position_ms);
        inner.position_ms = position_ms;
        Ok(())
    }

    fn set_speed(&self, speed: f32) -> EngineResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.speeds.push(speed);
        inner.speed = speed;
        Ok(())
    }

    fn position_ms(&self) -> EngineResult<u64> {
        Ok(self.inner.lock().unwrap().position_ms)
    }

    fn duration_ms(&self) -> EngineResult<u64> {
        Ok(self.inner.lock().unwrap().duration_ms)
    }

    fn is_playing(&self) -> EngineResult<bool> {
        Ok(self.inner.lock().unwrap().playing)
    }

    fn speed(&self) -> EngineResult<f32> {
        Ok(self.inner.lock().unwrap().speed)
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events.lock().unwrap().push(tx);
        rx
    }
}

/// Store capturing every persisted record
pub(crate) struct MockStore {
    writes: Mutex<Vec<ProgressRecord>>,
}

impl MockStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            writes: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn writes(&self) -> Vec<ProgressRecord> {
        self.writes.lock().unwrap().clone()
    }
}

impl ProgressStore for MockStore {
    fn update_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Notifier capturing every emitted notification
pub(crate) struct MockNotifier {
    completed: Mutex<Vec<String>>,
    sessions: Mutex<Vec<u64>>,
}

impl MockNotifier {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            completed: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub(crate) fn sessions(&self) -> Vec<u64> {
        self.sessions.lock().unwrap().clone()
    }
}

impl SessionNotifier for MockNotifier {
    fn on_book_completed(&self, title: &str) {
        self.completed.lock().unwrap().push(title.to_string());
    }

    fn on_listening_session_completed(&self, minutes: u64) {
        self.sessions.lock().unwrap().push(minutes);
    }
}
