#![allow(dead_code)]

use autoplay::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

#[derive(Default)]
pub struct RecordingToggle {
    pub linked: Mutex<bool>,
    pub states: Mutex<Vec<ToggleState>>,
}

impl RecordingToggle {
    pub fn last(&self) -> Option<ToggleState> {
        self.states.lock().unwrap().last().copied()
    }
}

impl ToggleButton for RecordingToggle {
    fn link_controls(&self) {
        *self.linked.lock().unwrap() = true;
    }

    fn update(&self, state: ToggleState) {
        self.states.lock().unwrap().push(state);
    }
}

#[derive(Default)]
pub struct RecordingBar {
    pub rates: Mutex<Vec<f64>>,
}

impl RecordingBar {
    pub fn last(&self) -> Option<f64> {
        self.rates.lock().unwrap().last().copied()
    }
}

impl ProgressBar for RecordingBar {
    fn set_progress(&self, rate: f64) {
        self.rates.lock().unwrap().push(rate);
    }
}

/// A controller wired to recording collaborators, driven by hand.
pub struct Harness {
    pub controller: AutoplayController,
    pub carousel: Arc<MemoryCarousel>,
    pub toggle: Arc<RecordingToggle>,
    pub bar: Arc<RecordingBar>,
    pub events: broadcast::Receiver<AutoplayEvent>,
    pub carousel_events: broadcast::Receiver<CarouselEvent>,
}

impl Harness {
    pub fn new(config: AutoplayConfig, slides: Vec<Slide>) -> Self {
        let carousel = Arc::new(MemoryCarousel::new(slides));
        let toggle = Arc::new(RecordingToggle::default());
        let bar = Arc::new(RecordingBar::default());
        let (frames, _) = broadcast::channel(16);
        let (event_sender, events) = broadcast::channel(1024);
        let (system_event_sender, _) = broadcast::channel(64);
        let carousel_events = carousel.subscribe();
        let parts = AutoplayParts::new(carousel.clone())
            .with_toggle(toggle.clone())
            .with_bar(bar.clone());
        let controller = AutoplayController::new(
            Arc::new(config),
            parts,
            frames,
            event_sender,
            system_event_sender,
        )
        .expect("harness config is valid");
        Self {
            controller,
            carousel,
            toggle,
            bar,
            events,
            carousel_events,
        }
    }

    /// Moves time forward and delivers one frame, then feeds back any
    /// carousel events the frame caused, the way the engine loop would.
    pub async fn frame_after(&mut self, ms: u64) -> bool {
        tokio::time::advance(Duration::from_millis(ms)).await;
        let completed = self.controller.process_frame(Instant::now());
        self.deliver_carousel_events();
        completed
    }

    pub fn deliver_carousel_events(&mut self) {
        while let Ok(event) = self.carousel_events.try_recv() {
            self.controller.handle_carousel_event(event);
        }
    }

    /// Lifecycle events so far, without per-frame progress.
    pub fn lifecycle_events(&mut self) -> Vec<AutoplayEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok())
            .filter(|event| !matches!(event, AutoplayEvent::Playing { .. }))
            .collect()
    }

    pub fn progress(&self) -> f64 {
        self.controller.status().progress
    }
}

pub fn config(interval: u64) -> AutoplayConfig {
    AutoplayConfig {
        autoplay: AutoplayMode::On,
        interval,
        ..Default::default()
    }
}
