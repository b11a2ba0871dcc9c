//! Debounced progress persistence

use crate::error::StoreError;
use fablecast_core::ProgressRecord;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

/// Durable progress store collaborator
///
/// Writes are fire-and-forget from the coordinator's perspective: a
/// failed write is dropped and superseded by the next snapshot.
pub trait ProgressStore: Send + Sync {
    fn update_progress(&self, record: &ProgressRecord) -> Result<(), StoreError>;
}

/// Coalesces progress updates into at most one write per debounce window
///
/// The first update opens a window; updates arriving inside it replace
/// the pending record and the newest one is written when the window
/// closes. Runs on its own task so a slow store never delays sampling.
/// When the channel closes, the pending record flushes once before the
/// task exits.
pub(crate) async fn run_persister(
    mut updates: mpsc::UnboundedReceiver<ProgressRecord>,
    store: Arc<dyn ProgressStore>,
    window: Duration,
) {
    while let Some(first) = updates.recv().await {
        let mut pending = first;
        let mut channel_closed = false;

        let deadline = time::sleep(window);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                next = updates.recv() => match next {
                    Some(record) => pending = record,
                    None => {
                        channel_closed = true;
                        break;
                    }
                },
            }
        }

        match store.update_progress(&pending) {
            Ok(()) => debug!(
                "Progress saved for {} at {} ms",
                pending.book_id, pending.position_ms
            ),
            Err(e) => warn!("Progress write dropped for {}: {}", pending.book_id, e),
        }

        if channel_closed {
            break;
        }
    }
    debug!("Persister stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablecast_core::BookId;
    use std::sync::Mutex;

    struct RecordingStore {
        writes: Mutex<Vec<ProgressRecord>>,
        attempts: Mutex<usize>,
        fail: Mutex<bool>,
    }

    impl RecordingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                writes: Mutex::new(Vec::new()),
                attempts: Mutex::new(0),
                fail: Mutex::new(false),
            })
        }

        fn writes(&self) -> Vec<ProgressRecord> {
            self.writes.lock().unwrap().clone()
        }

        fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    impl ProgressStore for RecordingStore {
        fn update_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
            *self.attempts.lock().unwrap() += 1;
            if *self.fail.lock().unwrap() {
                return Err(StoreError::WriteFailed("disk full".to_string()));
            }
            self.writes.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn record(position_ms: u64, progress: f64) -> ProgressRecord {
        ProgressRecord::new(BookId::new("book-1"), position_ms, progress, Some(1))
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_one_write_with_last_values() {
        let store = RecordingStore::new();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_persister(rx, store.clone(), Duration::from_millis(500)));

        for i in 0..10u64 {
            tx.send(record(i * 1_000, i as f64 / 100.0)).unwrap();
        }
        settle().await;
        assert!(store.writes().is_empty());

        time::advance(Duration::from_millis(500)).await;
        settle().await;

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].position_ms, 9_000);
        assert_eq!(writes[0].progress, 0.09);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_produce_separate_writes() {
        let store = RecordingStore::new();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_persister(rx, store.clone(), Duration::from_millis(500)));

        tx.send(record(1_000, 0.01)).unwrap();
        time::advance(Duration::from_millis(500)).await;
        settle().await;

        tx.send(record(2_000, 0.02)).unwrap();
        time::advance(Duration::from_millis(500)).await;
        settle().await;

        let writes = store.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].position_ms, 1_000);
        assert_eq!(writes[1].position_ms, 2_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_record_flushes_on_close() {
        let store = RecordingStore::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_persister(rx, store.clone(), Duration::from_millis(500)));

        tx.send(record(42_000, 0.42)).unwrap();
        drop(tx);
        handle.await.unwrap();

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].position_ms, 42_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_is_dropped_not_retried() {
        let store = RecordingStore::new();
        *store.fail.lock().unwrap() = true;
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_persister(rx, store.clone(), Duration::from_millis(500)));

        tx.send(record(1_000, 0.01)).unwrap();
        time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(store.attempts(), 1);
        assert!(store.writes().is_empty());

        // No retry happens on its own; only a fresh update writes again.
        time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(store.attempts(), 1);

        *store.fail.lock().unwrap() = false;
        tx.send(record(2_000, 0.02)).unwrap();
        time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(store.attempts(), 2);
        assert_eq!(store.writes().len(), 1);
        assert_eq!(store.writes()[0].position_ms, 2_000);
    }
}
