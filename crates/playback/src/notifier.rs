//! Edge-triggered session notifications

use fablecast_core::{Audiobook, BookId};
use log::debug;
use std::time::Duration;
use tokio::time::Instant;

/// Notification collaborator invoked on session milestones
///
/// Delivery and scheduling are the collaborator's concern; this layer
/// only decides when and with what values to invoke it.
pub trait SessionNotifier: Send + Sync {
    /// A book's progress crossed the completion threshold
    fn on_book_completed(&self, title: &str);

    /// A listening session of at least the minimum length ended
    fn on_listening_session_completed(&self, minutes: u64);
}

/// Tracks the two one-shot triggers for the active session
///
/// Both triggers are edge-triggered: they fire on a threshold crossing
/// or a play/pause transition, never on every tick the condition
/// holds.
pub(crate) struct SessionEventTracker {
    completion_threshold: f64,
    min_session: Duration,
    book_id: Option<BookId>,
    completion_fired: bool,
    last_progress: f64,
    playing_since: Option<Instant>,
}

impl SessionEventTracker {
    pub(crate) fn new(completion_threshold: f64, min_session: Duration) -> Self {
        Self {
            completion_threshold,
            min_session,
            book_id: None,
            completion_fired: false,
            last_progress: 0.0,
            playing_since: None,
        }
    }

    /// Registers a book load; re-arms the completion trigger only when
    /// the id differs from the current book
    pub(crate) fn on_book_loaded(&mut self, id: &BookId) {
        if self.book_id.as_ref() != Some(id) {
            self.book_id = Some(id.clone());
            self.completion_fired = false;
            debug!("Completion trigger armed for {}", id);
        }
        self.last_progress = 0.0;
    }

    /// Observes one state snapshot and fires any trigger whose edge
    /// was crossed
    pub(crate) fn observe(
        &mut self,
        progress: f64,
        is_playing: bool,
        book: Option<&Audiobook>,
        notifier: &dyn SessionNotifier,
    ) {
        if let Some(book) = book {
            if !self.completion_fired
                && self.last_progress < self.completion_threshold
                && progress >= self.completion_threshold
            {
                self.completion_fired = true;
                notifier.on_book_completed(&book.title);
            }
        }
        self.last_progress = progress;

        match (self.playing_since, is_playing) {
            (None, true) => self.playing_since = Some(Instant::now()),
            (Some(started), false) => {
                self.playing_since = None;
                let elapsed = started.elapsed();
                if elapsed >= self.min_session {
                    let minutes = elapsed.as_millis() as u64 / 60_000;
                    notifier.on_listening_session_completed(minutes);
                }
            }
            _ => {}
        }
    }
}
