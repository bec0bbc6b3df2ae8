//! Defines all event types flowing into and out of the autoplay controller.
//!
//! Outbound events (`AutoplayEvent`, `SystemEvent`) are broadcast to any number
//! of subscribers. Inbound events (`InputEvent`, `CarouselEvent`) are raw
//! signals from the carousel and its elements that the controller reacts to.

use crate::common::{ListenerId, Target, Trigger};
use tokio::time::Instant;

/// Lifecycle events emitted by the autoplay controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoplayEvent {
    /// Autoplay (re)started.
    Play,
    /// Autoplay was suspended, either transiently or by an explicit stop.
    Pause,
    /// Fired on every frame while running, and on rewind.
    /// `progress` is the fraction of the current slide's interval, in `0..=1`.
    Playing { progress: f64 },
}

/// Raw input signals from the carousel's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    /// The play/pause toggle button was clicked.
    ToggleClick,
}

impl InputEvent {
    /// The element that raises this event.
    pub fn target(self) -> Target {
        match self {
            InputEvent::ToggleClick => Target::Toggle,
            _ => Target::Root,
        }
    }

    pub fn trigger(self) -> Trigger {
        match self {
            InputEvent::PointerEnter => Trigger::PointerEnter,
            InputEvent::PointerLeave => Trigger::PointerLeave,
            InputEvent::FocusIn => Trigger::FocusIn,
            InputEvent::FocusOut => Trigger::FocusOut,
            InputEvent::ToggleClick => Trigger::ToggleClick,
        }
    }
}

/// Events published by the carousel itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    /// The carousel navigated to the slide at `index`.
    Moved { index: usize },
    /// The carousel was scrolled without a slide change.
    Scrolled,
    /// The carousel re-measured or rebuilt its slides.
    Refreshed,
}

impl CarouselEvent {
    pub fn trigger(self) -> Trigger {
        match self {
            CarouselEvent::Moved { .. } => Trigger::Move,
            CarouselEvent::Scrolled => Trigger::Scroll,
            CarouselEvent::Refreshed => Trigger::Refresh,
        }
    }
}

/// Events related to the lifecycle of the engine and its listeners.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the engine's `run` loop begins.
    EngineStarted { timestamp: Instant },
    /// Fired once when the engine's `run` loop is about to exit.
    EngineShutdown,
    /// Fired when the controller binds a listener.
    ListenerAdded { id: ListenerId },
    /// Fired when the controller unbinds a listener.
    ListenerRemoved { id: ListenerId },
}
