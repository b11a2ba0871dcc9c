//! Periodic position sampling

use crate::engine::PlaybackEngine;
use crate::state::StateUpdate;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

/// Samples position and duration from the engine on a fixed period
///
/// The first sample lands one period after start; the connect-time
/// sync covers the initial state. Runs until the connected flag flips
/// false or the update channel closes. A failed engine read skips the
/// tick; the loop continues.
pub(crate) async fn run_sampler(
    engine: Arc<dyn PlaybackEngine>,
    updates: mpsc::UnboundedSender<StateUpdate>,
    mut connected: watch::Receiver<bool>,
    period: Duration,
) {
    let mut ticks = time::interval_at(time::Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                let sample = engine
                    .position_ms()
                    .and_then(|position_ms| engine.duration_ms().map(|d| (position_ms, d)));
                match sample {
                    Ok((position_ms, duration_ms)) => {
                        let update = StateUpdate::Position { position_ms, duration_ms };
                        if updates.send(update).is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!("Sample tick skipped: {}", e),
                }
            }
            changed = connected.changed() => {
                if changed.is_err() || !*connected.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Sampler stopped");
}
