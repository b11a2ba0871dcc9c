//! Engine connection lifecycle

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::error::EngineResult;
use crate::sampler;
use crate::state::StateUpdate;
use log::{debug, info};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Connection lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
}

/// Connection-lifecycle wrapper around the playback engine
///
/// Owns the sampler and event-forwarding tasks; both stop when the
/// connected flag flips false. Reconnection only ever happens through
/// an explicit `connect` call; this layer never retries on its own.
pub(crate) struct PlaybackController {
    engine: Arc<dyn PlaybackEngine>,
    phase: Mutex<ConnectionPhase>,
    updates: mpsc::UnboundedSender<StateUpdate>,
    connected_tx: watch::Sender<bool>,
    sample_period: Duration,
}

impl PlaybackController {
    pub(crate) fn new(
        engine: Arc<dyn PlaybackEngine>,
        updates: mpsc::UnboundedSender<StateUpdate>,
        sample_period: Duration,
    ) -> Self {
        let (connected_tx, _) = watch::channel(false);
        Self {
            engine,
            phase: Mutex::new(ConnectionPhase::Disconnected),
            updates,
            connected_tx,
            sample_period,
        }
    }

    /// Current connection phase
    pub(crate) fn phase(&self) -> ConnectionPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Establishes the engine connection
    ///
    /// Idempotent: a call while already connecting or connected is a
    /// no-op. On success exactly one synchronous state sync is pushed
    /// before periodic sampling starts. On failure the phase returns to
    /// `Disconnected` and `connected = false` is published.
    pub(crate) fn connect(&self) -> EngineResult<()> {
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            if *phase != ConnectionPhase::Disconnected {
                debug!("Connect ignored, already {:?}", *phase);
                return Ok(());
            }
            *phase = ConnectionPhase::Connecting;
        }

        if let Err(e) = self.engine.connect().and_then(|()| self.sync_state()) {
            self.engine.disconnect();
            *self.phase.lock().unwrap_or_else(PoisonError::into_inner) =
                ConnectionPhase::Disconnected;
            self.connected_tx.send_replace(false);
            let _ = self.updates.send(StateUpdate::Connected(false));
            return Err(e);
        }

        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = ConnectionPhase::Connected;
        self.connected_tx.send_replace(true);
        let _ = self.updates.send(StateUpdate::Connected(true));

        tokio::spawn(sampler::run_sampler(
            Arc::clone(&self.engine),
            self.updates.clone(),
            self.connected_tx.subscribe(),
            self.sample_period,
        ));
        tokio::spawn(forward_events(
            self.engine.subscribe(),
            self.updates.clone(),
            self.connected_tx.subscribe(),
        ));

        info!("Engine connected");
        Ok(())
    }

    /// Releases the connection and cancels dependent tasks
    pub(crate) fn disconnect(&self) {
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            if *phase == ConnectionPhase::Disconnected {
                return;
            }
            *phase = ConnectionPhase::Disconnected;
        }
        self.connected_tx.send_replace(false);
        self.engine.disconnect();
        let _ = self.updates.send(StateUpdate::Connected(false));
        info!("Engine disconnected");
    }

    fn sync_state(&self) -> EngineResult<()> {
        let position_ms = self.engine.position_ms()?;
        let duration_ms = self.engine.duration_ms()?;
        let speed = self.engine.speed()?;
        let is_playing = self.engine.is_playing()?;
        let _ = self.updates.send(StateUpdate::Sync {
            position_ms,
            duration_ms,
            speed,
            is_playing,
        });
        Ok(())
    }
}

/// Forwards engine-originated events into the state-update path until
/// the connected flag flips false or either channel closes
async fn forward_events(
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    updates: mpsc::UnboundedSender<StateUpdate>,
    mut connected: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    let update = match event {
                        EngineEvent::PlayingChanged(playing) => StateUpdate::Playing(playing),
                        EngineEvent::SpeedChanged(speed) => StateUpdate::Speed(speed),
                        EngineEvent::TrackTransition { position_ms, duration_ms } => {
                            StateUpdate::Position { position_ms, duration_ms }
                        }
                        EngineEvent::Ended => StateUpdate::Ended,
                    };
                    if updates.send(update).is_err() {
                        break;
                    }
                }
                None => break,
            },
            changed = connected.changed() => {
                if changed.is_err() || !*connected.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Event forwarding stopped");
}
