//! The carousel-side collaborators the controller talks to.
//!
//! The controller never renders anything. It asks a `Carousel` about its
//! slides and tells it to move on, reflects its state through an optional
//! `ToggleButton`, and reports progress to an optional `ProgressBar`.

use crate::events::CarouselEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// The slide collection and navigation capability.
pub trait Carousel: Send + Sync {
    /// Whether there are enough slides for autoplay to make sense.
    fn is_enough(&self) -> bool;

    /// Index of the slide currently shown.
    fn index(&self) -> usize;

    /// The raw per-slide interval override, if the slide carries one.
    fn interval_attribute(&self, index: usize) -> Option<String>;

    /// Moves to the next slide.
    fn advance(&self);

    /// Subscribes to the carousel's own events.
    fn subscribe(&self) -> broadcast::Receiver<CarouselEvent>;
}

/// Text key the toggle button resolves into its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLabel {
    Play,
    Pause,
}

/// Visual state of the play/pause toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    /// True unless autoplay is explicitly stopped.
    pub active: bool,
    /// The action the button performs when clicked.
    pub label: ToggleLabel,
}

impl ToggleState {
    pub fn from_stopped(stopped: bool) -> Self {
        Self {
            active: !stopped,
            label: if stopped { ToggleLabel::Play } else { ToggleLabel::Pause },
        }
    }
}

/// The play/pause toggle button.
pub trait ToggleButton: Send + Sync {
    /// Links the button to the slide track it controls.
    fn link_controls(&self);

    fn update(&self, state: ToggleState);
}

/// A progress indicator for the current slide.
pub trait ProgressBar: Send + Sync {
    /// `rate` is in `0..=1`.
    fn set_progress(&self, rate: f64);
}

/// The collaborators one controller is mounted against.
#[derive(Clone)]
pub struct AutoplayParts {
    pub carousel: Arc<dyn Carousel>,
    pub toggle: Option<Arc<dyn ToggleButton>>,
    pub bar: Option<Arc<dyn ProgressBar>>,
}

impl AutoplayParts {
    pub fn new(carousel: Arc<dyn Carousel>) -> Self {
        Self {
            carousel,
            toggle: None,
            bar: None,
        }
    }

    pub fn with_toggle(mut self, toggle: Arc<dyn ToggleButton>) -> Self {
        self.toggle = Some(toggle);
        self
    }

    pub fn with_bar(mut self, bar: Arc<dyn ProgressBar>) -> Self {
        self.bar = Some(bar);
        self
    }
}

/// A single slide of a `MemoryCarousel`.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    /// Raw interval override, as it would appear in markup.
    pub interval: Option<String>,
}

impl Slide {
    pub fn with_interval(interval: impl Into<String>) -> Self {
        Self {
            interval: Some(interval.into()),
        }
    }
}

/// An in-memory carousel that wraps around at the end.
///
/// Every movement is published on its event channel, exactly as a rendered
/// carousel would announce it.
#[derive(Debug)]
pub struct MemoryCarousel {
    slides: Vec<Slide>,
    per_page: usize,
    index: AtomicUsize,
    advances: AtomicUsize,
    event_sender: broadcast::Sender<CarouselEvent>,
}

impl MemoryCarousel {
    pub fn new(slides: Vec<Slide>) -> Self {
        let (event_sender, _) = broadcast::channel(64);
        Self {
            slides,
            per_page: 1,
            index: AtomicUsize::new(0),
            advances: AtomicUsize::new(0),
            event_sender,
        }
    }

    /// Sets how many slides are visible at once.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// How many times `advance` has been called.
    pub fn advances(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }

    /// Jumps to `index`. Returns `false` if there is no such slide.
    pub fn go(&self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.index.store(index, Ordering::SeqCst);
        self.event_sender.send(CarouselEvent::Moved { index }).ok();
        true
    }

    pub fn scroll(&self) {
        self.event_sender.send(CarouselEvent::Scrolled).ok();
    }

    pub fn refresh(&self) {
        self.event_sender.send(CarouselEvent::Refreshed).ok();
    }
}

impl Carousel for MemoryCarousel {
    fn is_enough(&self) -> bool {
        self.slides.len() > self.per_page
    }

    fn index(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    fn interval_attribute(&self, index: usize) -> Option<String> {
        self.slides.get(index).and_then(|slide| slide.interval.clone())
    }

    fn advance(&self) {
        self.advances.fetch_add(1, Ordering::SeqCst);
        if self.slides.is_empty() {
            return;
        }
        let next = (self.index() + 1) % self.slides.len();
        self.go(next);
    }

    fn subscribe(&self) -> broadcast::Receiver<CarouselEvent> {
        self.event_sender.subscribe()
    }
}
