//! # Autoplay
//!
//! A frame-driven autoplay controller for carousels and sliders.
//!
//! The crate advances slides on a timer, tracks progress through each slide's
//! interval across pauses, and suspends itself while the pointer hovers the
//! carousel or focus is inside it. Rendering is someone else's job: the
//! controller talks to the carousel through a handful of small traits.
//!
//! ## Core Concepts
//!
//! - **IntervalScheduler**: a pausable, rewindable interval that reports
//!   fractional progress on every frame and restarts itself when a cycle ends.
//! - **Suspend reasons**: explicit stop, hover and focus are tracked
//!   independently. An explicit stop always wins; hover and focus only pause
//!   transiently.
//! - **SystemClock**: a frame-rate ticker that paces progress updates.
//! - **Event-Driven**: progress and play/pause transitions are broadcast as
//!   `AutoplayEvent`s; carousel movement arrives as `CarouselEvent`s.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use autoplay::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Describe the behavior.
//!     let config = AutoplayConfig {
//!         autoplay: AutoplayMode::On,
//!         interval: 3000,
//!         ..Default::default()
//!     };
//!
//!     // 2. Point it at a carousel.
//!     let carousel = Arc::new(MemoryCarousel::new(vec![
//!         Slide::default(),
//!         Slide::with_interval("8000"),
//!         Slide::default(),
//!     ]));
//!     let engine = AutoplayEngine::new(config, AutoplayParts::new(carousel))?;
//!
//!     // 3. Subscribe before running.
//!     let mut events = engine.subscribe_events();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("{:?}", event);
//!         }
//!     });
//!
//!     // 4. Run until Ctrl+C.
//!     engine.run().await
//! }
//! ```

pub const ENGINE_NAME: &str = "Autoplay Engine";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod carousel;
pub mod common;
pub mod components;
pub mod config;
pub mod controller;
pub mod engine;
pub mod events;
pub mod time;

/// A prelude module for easy importing of the most common autoplay types.
pub mod prelude {
    pub use crate::carousel::{
        AutoplayParts, Carousel, MemoryCarousel, ProgressBar, Slide, ToggleButton, ToggleLabel,
        ToggleState,
    };
    pub use crate::common::{ListenerId, Target, Trigger};
    pub use crate::components::suspend::AutoplayState;
    pub use crate::config::{AutoplayConfig, AutoplayMode, ClockResolution};
    pub use crate::controller::{AutoplayController, AutoplayStatus};
    pub use crate::engine::{AutoplayEngine, AutoplayHandle};
    pub use crate::events::{AutoplayEvent, CarouselEvent, InputEvent, SystemEvent};
}
