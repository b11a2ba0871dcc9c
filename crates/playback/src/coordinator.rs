//! Top-level playback coordination
//!
//! Composes the controller, sampler, chapter resolver, progress
//! persister and session notifier around a single state-update task.
//! Collaborators are injected through the constructor; there is no
//! global state.

use crate::chapters;
use crate::config::CoordinatorConfig;
use crate::controller::{ConnectionPhase, PlaybackController};
use crate::engine::PlaybackEngine;
use crate::error::CoordinatorResult;
use crate::notifier::{SessionEventTracker, SessionNotifier};
use crate::persister::{self, ProgressStore};
use crate::state::{PlaybackState, StateUpdate};
use fablecast_core::{Audiobook, Chapter, ProgressRecord, Validator};
use log::info;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};

/// Authoritative coordinator for one playback session
///
/// Commands are synchronous requests forwarded to the engine; state
/// changes are observed asynchronously through the watch channel
/// returned by [`state`](PlaybackCoordinator::state), never from the
/// command call itself. Must be created inside a tokio runtime.
pub struct PlaybackCoordinator {
    engine: Arc<dyn PlaybackEngine>,
    controller: PlaybackController,
    updates: mpsc::UnboundedSender<StateUpdate>,
    state_rx: watch::Receiver<PlaybackState>,
    book: Mutex<Option<Arc<Audiobook>>>,
    config: CoordinatorConfig,
}

impl PlaybackCoordinator {
    /// Creates a coordinator with the default configuration
    pub fn new(
        engine: Arc<dyn PlaybackEngine>,
        store: Arc<dyn ProgressStore>,
        notifier: Arc<dyn SessionNotifier>,
    ) -> Self {
        Self::with_config(engine, store, notifier, CoordinatorConfig::default())
    }

    pub fn with_config(
        engine: Arc<dyn PlaybackEngine>,
        store: Arc<dyn ProgressStore>,
        notifier: Arc<dyn SessionNotifier>,
        config: CoordinatorConfig,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlaybackState::new());
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();

        tokio::spawn(persister::run_persister(
            persist_rx,
            store,
            config.debounce_window,
        ));

        let tracker =
            SessionEventTracker::new(config.completion_threshold, config.min_session);
        tokio::spawn(run_update_loop(
            updates_rx, state_tx, persist_tx, notifier, tracker,
        ));

        let controller =
            PlaybackController::new(Arc::clone(&engine), updates_tx.clone(), config.sample_period);

        Self {
            engine,
            controller,
            updates: updates_tx,
            state_rx,
            book: Mutex::new(None),
            config,
        }
    }

    /// Subscribes to the shared playback state
    pub fn state(&self) -> watch::Receiver<PlaybackState> {
        self.state_rx.clone()
    }

    /// Snapshot of the current playback state
    pub fn current_state(&self) -> PlaybackState {
        self.state_rx.borrow().clone()
    }

    /// Current connection phase
    pub fn connection_phase(&self) -> ConnectionPhase {
        self.controller.phase()
    }

    /// The book currently targeted by this session
    pub fn active_book(&self) -> Option<Arc<Audiobook>> {
        self.book
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Makes `book` the active session target
    ///
    /// Resets the shared state for the new session. Loading a book with
    /// the currently active id does not re-arm the completion trigger.
    pub fn load_book(&self, book: Audiobook) -> CoordinatorResult<()> {
        book.validate().map_err(fablecast_core::CoreError::from)?;
        let book = Arc::new(book);
        *self.book.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&book));
        info!("Book loaded: {}", book.title);
        let _ = self.updates.send(StateUpdate::BookLoaded(book));
        Ok(())
    }

    /// Establishes the engine connection (idempotent)
    pub fn connect(&self) -> CoordinatorResult<()> {
        self.controller.connect()?;
        Ok(())
    }

    /// Releases the engine connection and stops sampling
    pub fn disconnect(&self) {
        self.controller.disconnect();
    }

    pub fn play(&self) -> CoordinatorResult<()> {
        self.engine.play()?;
        Ok(())
    }

    pub fn pause(&self) -> CoordinatorResult<()> {
        self.engine.pause()?;
        Ok(())
    }

    pub fn toggle_play_pause(&self) -> CoordinatorResult<()> {
        if self.state_rx.borrow().is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Seeks to `position_ms`, clamped to the known duration
    pub fn seek_to(&self, position_ms: u64) -> CoordinatorResult<()> {
        let duration_ms = self.state_rx.borrow().duration_ms;
        let target = if duration_ms > 0 {
            position_ms.min(duration_ms)
        } else {
            position_ms
        };
        self.engine.seek_to(target)?;
        let _ = self.updates.send(StateUpdate::Seek {
            position_ms: target,
        });
        Ok(())
    }

    /// Seeks to a fraction of the content, clamped to [0, 1]
    pub fn seek_to_progress(&self, fraction: f64) -> CoordinatorResult<()> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let duration_ms = self.state_rx.borrow().duration_ms;
        self.seek_to((duration_ms as f64 * fraction) as u64)
    }

    /// Seeks to the start of the given chapter
    pub fn seek_to_chapter(&self, chapter: &Chapter) -> CoordinatorResult<()> {
        self.seek_to(chapter.start_time_ms)
    }

    /// Seeks to the start of the chapter after the current position
    ///
    /// No-op when there is no next chapter or no book is loaded.
    pub fn next_chapter(&self) -> CoordinatorResult<()> {
        let position_ms = self.state_rx.borrow().position_ms;
        let target = self.active_book().and_then(|book| {
            chapters::next_after(position_ms, &book.chapters).map(|c| c.start_time_ms)
        });
        match target {
            Some(start) => self.seek_to(start),
            None => Ok(()),
        }
    }

    /// Seeks to the start of the chapter before the current one
    pub fn previous_chapter(&self) -> CoordinatorResult<()> {
        let position_ms = self.state_rx.borrow().position_ms;
        let target = self.active_book().and_then(|book| {
            chapters::previous_before(position_ms, &book.chapters).map(|c| c.start_time_ms)
        });
        match target {
            Some(start) => self.seek_to(start),
            None => Ok(()),
        }
    }

    /// Skips forward by the configured offset, clamped to the duration
    pub fn skip_forward(&self) -> CoordinatorResult<()> {
        let position_ms = self.state_rx.borrow().position_ms;
        self.seek_to(position_ms.saturating_add(self.config.skip_forward_ms))
    }

    /// Skips backward by the configured offset, never below zero
    pub fn skip_backward(&self) -> CoordinatorResult<()> {
        let position_ms = self.state_rx.borrow().position_ms;
        self.seek_to(position_ms.saturating_sub(self.config.skip_backward_ms))
    }

    /// Sets playback speed, clamped to the configured range
    pub fn set_speed(&self, speed: f32) -> CoordinatorResult<()> {
        let speed = speed.clamp(self.config.min_speed, self.config.max_speed);
        self.engine.set_speed(speed)?;
        let _ = self.updates.send(StateUpdate::Speed(speed));
        Ok(())
    }
}

/// The single writer of the shared playback state
///
/// Applies every mutation in arrival order, resolves the current
/// chapter against the same snapshot, feeds the persister and the
/// session tracker, then publishes. Exits when every update sender is
/// gone, which in turn closes the persister channel and flushes the
/// pending write.
async fn run_update_loop(
    mut updates: mpsc::UnboundedReceiver<StateUpdate>,
    state_tx: watch::Sender<PlaybackState>,
    persist_tx: mpsc::UnboundedSender<ProgressRecord>,
    notifier: Arc<dyn SessionNotifier>,
    mut tracker: SessionEventTracker,
) {
    let mut book: Option<Arc<Audiobook>> = None;

    while let Some(update) = updates.recv().await {
        let mut state = state_tx.borrow().clone();
        match update {
            StateUpdate::BookLoaded(loaded) => {
                tracker.on_book_loaded(&loaded.id);
                state.position_ms = 0;
                state.duration_ms = 0;
                state.current_chapter = None;
                book = Some(loaded);
            }
            StateUpdate::Connected(connected) => {
                state.connected = connected;
                if !connected {
                    state.is_playing = false;
                }
            }
            StateUpdate::Sync {
                position_ms,
                duration_ms,
                speed,
                is_playing,
            } => {
                state.position_ms = position_ms;
                state.duration_ms = duration_ms;
                state.speed = speed;
                state.is_playing = is_playing;
            }
            StateUpdate::Position {
                position_ms,
                duration_ms,
            } => {
                state.position_ms = position_ms;
                state.duration_ms = duration_ms;
            }
            StateUpdate::Seek { position_ms } => state.position_ms = position_ms,
            StateUpdate::Playing(playing) => state.is_playing = playing,
            StateUpdate::Speed(speed) => state.speed = speed,
            StateUpdate::Ended => {
                state.is_playing = false;
                if state.duration_ms > 0 {
                    state.position_ms = state.duration_ms;
                }
            }
        }

        if let Some(active) = book.as_ref() {
            state.current_chapter =
                chapters::resolve(state.position_ms, &active.chapters).cloned();
        }

        let progress = state.progress_fraction();
        tracker.observe(progress, state.is_playing, book.as_deref(), notifier.as_ref());

        if let Some(active) = book.as_ref() {
            if state.duration_ms > 0 {
                let record = ProgressRecord::new(
                    active.id.clone(),
                    state.position_ms,
                    progress,
                    state.current_chapter.as_ref().map(|c| c.number),
                );
                let _ = persist_tx.send(record);
            }
        }

        state_tx.send_replace(state);
    }
}
