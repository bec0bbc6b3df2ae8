//! The frame source that paces every progress update.
//!
//! `SystemClock` runs as its own task and broadcasts a `TickEvent` once per
//! frame. Consumers subscribe only while they need frames; dropping the
//! receiver is all it takes to stop observing them.

use crate::config::ClockResolution;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// A single frame of the clock.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Monotonic frame counter, starting at 1.
    pub tick_count: u64,
    /// The instant this frame was produced.
    pub timestamp: Instant,
}

/// Sending side of the frame stream.
pub type FrameSender = broadcast::Sender<Arc<TickEvent>>;

/// A frame-rate ticker that acts as the single source of time.
pub struct SystemClock {
    resolution: ClockResolution,
    tick_sender: FrameSender,
}

impl SystemClock {
    pub fn new(resolution: ClockResolution, tick_sender: FrameSender) -> Self {
        Self {
            resolution,
            tick_sender,
        }
    }

    /// Emits frames until a shutdown signal arrives.
    ///
    /// Late frames are skipped rather than bursted, the same way a display
    /// drops frames under load.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let period = self.resolution.frame_period();
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!("SystemClock running with a {:?} frame period.", period);

        let mut tick_count = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                timestamp = ticker.tick() => {
                    tick_count += 1;
                    trace!("Frame #{}", tick_count);
                    // No receivers simply means nothing is playing right now.
                    self.tick_sender
                        .send(Arc::new(TickEvent { tick_count, timestamp }))
                        .ok();
                }
            }
        }
        debug!("SystemClock stopped after {} frames.", tick_count);
    }
}
