//! A restartable, pausable interval that reports fractional progress per frame.

use crate::time::{FrameSender, TickEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;
use tracing::trace;

/// Receives the progress of the current cycle, in `0..=1`.
pub type ProgressCallback = Box<dyn FnMut(f64) + Send + Sync>;

/// Runs once every time a cycle completes.
pub type IntervalCallback = Box<dyn FnMut() + Send + Sync>;

/// Tracks progress through a repeating interval across pauses and resumes.
///
/// Progress is `(now - started_at + elapsed_before_pause) / duration`, clamped
/// to `0..=1`. While running, the scheduler holds a subscription to the frame
/// clock; every frame reports progress and, once a cycle is complete, fires the
/// interval callback and starts the next cycle without stopping.
///
/// A paused scheduler never holds a frame subscription, so no frame can reach
/// it after `pause` or `cancel` returns.
pub struct IntervalScheduler {
    duration: Duration,
    started_at: Option<Instant>,
    elapsed_before_pause: Duration,
    paused: bool,
    frames: FrameSender,
    frame: Option<broadcast::Receiver<Arc<TickEvent>>>,
    on_progress: ProgressCallback,
    on_interval: IntervalCallback,
}

impl IntervalScheduler {
    /// Creates a paused scheduler that will draw its frames from `frames`.
    pub fn new(
        duration: Duration,
        frames: FrameSender,
        on_progress: ProgressCallback,
        on_interval: IntervalCallback,
    ) -> Self {
        Self {
            duration,
            started_at: None,
            elapsed_before_pause: Duration::ZERO,
            paused: true,
            frames,
            frame: None,
            on_progress,
            on_interval,
        }
    }

    /// Begins ticking, or resumes if `keep_elapsed` is true.
    ///
    /// Does nothing if the scheduler is already running.
    pub fn start(&mut self, keep_elapsed: bool) {
        if !self.paused {
            return;
        }
        if !keep_elapsed {
            self.elapsed_before_pause = Duration::ZERO;
        }
        self.started_at = Some(Instant::now());
        self.frame = Some(self.frames.subscribe());
        self.paused = false;
    }

    /// Freezes progress and stops observing frames.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.elapsed_before_pause = self.elapsed_at(Instant::now());
        self.started_at = None;
        self.frame = None;
        self.paused = true;
    }

    /// Restarts the current cycle from zero without changing the running state.
    ///
    /// Reports zero progress straight away so indicators reset even while
    /// paused.
    pub fn rewind(&mut self) {
        self.elapsed_before_pause = Duration::ZERO;
        if !self.paused {
            self.started_at = Some(Instant::now());
        }
        (self.on_progress)(0.0);
    }

    /// Changes the interval length. Elapsed time is kept, so progress may jump.
    pub fn set(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Stops observing frames and forgets all progress.
    ///
    /// Safe to call repeatedly; a later `start` behaves as a fresh start.
    pub fn cancel(&mut self) {
        self.frame = None;
        self.started_at = None;
        self.elapsed_before_pause = Duration::ZERO;
        self.paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current progress of the cycle, in `0..=1`.
    pub fn progress(&self) -> f64 {
        self.progress_at(Instant::now())
    }

    /// Waits for the next frame while running.
    ///
    /// Pends forever while paused, which makes it safe to poll inside a
    /// `select!` loop. Returns `None` once the frame clock has gone away.
    pub async fn next_frame(&mut self) -> Option<Arc<TickEvent>> {
        let Some(frame) = self.frame.as_mut() else {
            return std::future::pending().await;
        };
        loop {
            match frame.recv().await {
                Ok(tick) => return Some(tick),
                Err(RecvError::Lagged(skipped)) => {
                    trace!("Interval lagged behind the frame clock by {} frames.", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Advances the interval to `now`.
    ///
    /// Reports progress and, if the cycle is complete, fires the interval
    /// callback and begins a new cycle. Returns `true` when a cycle completed.
    pub fn process_frame(&mut self, now: Instant) -> bool {
        if self.paused {
            return false;
        }
        let progress = self.progress_at(now);
        (self.on_progress)(progress);
        if progress < 1.0 {
            return false;
        }
        (self.on_interval)();
        self.started_at = Some(now);
        self.elapsed_before_pause = Duration::ZERO;
        true
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        let running = self
            .started_at
            .map(|started_at| now.saturating_duration_since(started_at))
            .unwrap_or_default();
        self.elapsed_before_pause + running
    }

    fn progress_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let rate = self.elapsed_at(now).as_secs_f64() / self.duration.as_secs_f64();
        rate.clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for IntervalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalScheduler")
            .field("duration", &self.duration)
            .field("started_at", &self.started_at)
            .field("elapsed_before_pause", &self.elapsed_before_pause)
            .field("paused", &self.paused)
            .field("subscribed", &self.frame.is_some())
            .finish()
    }
}
