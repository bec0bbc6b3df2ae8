use anyhow::Result;
use autoplay::prelude::*;
use autoplay::{ENGINE_NAME, VERSION};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renders progress as a log line every quarter of a slide.
struct LoggingBar;

impl ProgressBar for LoggingBar {
    fn set_progress(&self, rate: f64) {
        let percent = (rate * 100.0).round() as u32;
        if percent % 25 == 0 {
            tracing::debug!("[BAR] {:>3}%", percent);
        }
    }
}

struct LoggingToggle;

impl ToggleButton for LoggingToggle {
    fn link_controls(&self) {
        info!("[TOGGLE] linked to the slide track");
    }

    fn update(&self, state: ToggleState) {
        info!("[TOGGLE] active={} label={:?}", state.active, state.label);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 2. Load configuration from an optional file argument and CAROUSEL_* variables.
    let path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = AutoplayConfig::load(path.as_deref())?;
    if path.is_none() && !config.autoplay.is_enabled() {
        config.autoplay = AutoplayMode::On;
        config.interval = 2000;
    }
    info!("{}", format!("{} v{}", ENGINE_NAME, VERSION).cyan());

    // 3. Build a carousel where the third slide lingers longer.
    let carousel = Arc::new(MemoryCarousel::new(vec![
        Slide::default(),
        Slide::default(),
        Slide::with_interval("4000"),
        Slide::default(),
    ]));
    let parts = AutoplayParts::new(carousel.clone())
        .with_toggle(Arc::new(LoggingToggle))
        .with_bar(Arc::new(LoggingBar));
    let engine = AutoplayEngine::new(config, parts)?;

    // 4. Listen to the event streams.
    spawn_event_listeners(&engine);

    // 5. Script a few user interactions.
    spawn_demo_script(engine.handle());

    // 6. Run the engine.
    engine.run().await?;

    Ok(())
}

/// Spawns tasks that log the lifecycle and system event streams.
fn spawn_event_listeners(engine: &AutoplayEngine) {
    let mut event_rx = engine.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                AutoplayEvent::Playing { .. } => {}
                other => info!("[AUTOPLAY] => {:?}", other),
            }
        }
    });

    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            info!("[SYSTEM] => {:?}", event);
        }
    });
}

/// Hovers, leaves and clicks the toggle on a fixed schedule.
fn spawn_demo_script(handle: AutoplayHandle) {
    tokio::spawn(async move {
        let script = [
            (5, InputEvent::PointerEnter),
            (2, InputEvent::PointerLeave),
            (5, InputEvent::ToggleClick),
            (2, InputEvent::PointerEnter),
            (1, InputEvent::PointerLeave),
            (2, InputEvent::ToggleClick),
        ];
        for (delay, event) in script {
            tokio::time::sleep(Duration::from_secs(delay)).await;
            info!("[SCRIPT] {:?}", event);
            if handle.input(event).is_err() {
                return;
            }
            if let Ok(status) = handle.status().await {
                info!(
                    "[STATUS] {:?} progress={:.2} interval={:?}",
                    status.state, status.progress, status.interval
                );
            }
        }
    });
}
