mod common;

use autoplay::prelude::*;
use common::{config, RecordingBar, RecordingToggle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

fn engine_with(interval: u64, slides: Vec<Slide>) -> (AutoplayEngine, Arc<MemoryCarousel>) {
    let carousel = Arc::new(MemoryCarousel::new(slides));
    let config = AutoplayConfig {
        resolution: ClockResolution::Low,
        ..config(interval)
    };
    let parts = AutoplayParts::new(carousel.clone())
        .with_toggle(Arc::new(RecordingToggle::default()))
        .with_bar(Arc::new(RecordingBar::default()));
    (AutoplayEngine::new(config, parts).unwrap(), carousel)
}

#[tokio::test(start_paused = true)]
async fn engine_advances_slides_on_frames() {
    let (engine, carousel) = engine_with(1000, vec![Slide::default(); 3]);
    let handle = engine.handle();
    let task = tokio::spawn(engine.run_until(std::future::pending()));

    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(carousel.advances(), 1);
    assert_eq!(carousel.index(), 1);

    let status = handle.status().await.unwrap();
    assert_eq!(status.state, AutoplayState::Running);
    assert!(status.progress < 0.5);

    handle.destroy().unwrap();
    task.await.unwrap().unwrap();
    assert!(handle.play().is_err());
}

#[tokio::test(start_paused = true)]
async fn engine_routes_input_through_the_controller() {
    let (engine, carousel) = engine_with(1000, vec![Slide::default(); 3]);
    let handle = engine.handle();
    let mut events = engine.subscribe_events();
    let task = tokio::spawn(engine.run_until(std::future::pending()));

    handle.input(InputEvent::PointerEnter).unwrap();
    let status = handle.status().await.unwrap();
    assert_eq!(status.state, AutoplayState::PausedByHover);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(carousel.advances(), 0);

    handle.input(InputEvent::PointerLeave).unwrap();
    handle.input(InputEvent::ToggleClick).unwrap();
    let status = handle.status().await.unwrap();
    assert_eq!(status.state, AutoplayState::Stopped);

    handle.play().unwrap();
    assert_eq!(handle.status().await.unwrap().state, AutoplayState::Running);

    handle.destroy().unwrap();
    task.await.unwrap().unwrap();

    let lifecycle: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|event| !matches!(event, AutoplayEvent::Playing { .. }))
        .collect();
    assert_eq!(
        lifecycle,
        vec![
            AutoplayEvent::Play,
            AutoplayEvent::Pause,
            AutoplayEvent::Play,
            AutoplayEvent::Pause,
            AutoplayEvent::Play,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn engine_applies_overrides_after_navigation() {
    let (engine, carousel) = engine_with(
        1000,
        vec![Slide::default(), Slide::with_interval("8000"), Slide::default()],
    );
    let handle = engine.handle();
    let task = tokio::spawn(engine.run_until(std::future::pending()));

    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(carousel.index(), 1);
    let status = handle.status().await.unwrap();
    assert_eq!(status.interval, Duration::from_millis(8000));

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(carousel.index(), 1);

    carousel.go(2);
    tokio::time::sleep(Duration::from_millis(10)).await;
    let status = handle.status().await.unwrap();
    assert_eq!(status.interval, Duration::from_millis(1000));
    assert!(status.progress < 0.05);

    handle.destroy().unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn engine_reports_lifecycle_and_unbinds_on_shutdown() {
    let (engine, _carousel) = engine_with(1000, vec![Slide::default(); 3]);
    let mut system = engine.subscribe_system_events();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(engine.run_until(async {
        stop_rx.await.ok();
    }));

    tokio::time::sleep(Duration::from_millis(200)).await;
    stop_tx.send(()).unwrap();
    task.await.unwrap().unwrap();

    let events: Vec<_> = std::iter::from_fn(|| system.try_recv().ok()).collect();
    assert!(matches!(events.first(), Some(SystemEvent::EngineStarted { .. })));
    assert!(matches!(events.last(), Some(SystemEvent::EngineShutdown)));
    let added = events
        .iter()
        .filter(|event| matches!(event, SystemEvent::ListenerAdded { .. }))
        .count();
    let removed = events
        .iter()
        .filter(|event| matches!(event, SystemEvent::ListenerRemoved { .. }))
        .count();
    assert_eq!(added, 5);
    assert_eq!(removed, 5);
}

#[tokio::test(start_paused = true)]
async fn disabled_autoplay_never_moves() {
    let carousel = Arc::new(MemoryCarousel::new(vec![Slide::default(); 3]));
    let engine = AutoplayEngine::new(
        AutoplayConfig::default(),
        AutoplayParts::new(carousel.clone()),
    )
    .unwrap();
    let handle = engine.handle();
    let task = tokio::spawn(engine.run_until(std::future::pending()));

    handle.input(InputEvent::PointerLeave).unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(carousel.advances(), 0);
    assert_eq!(handle.status().await.unwrap().state, AutoplayState::Idle);

    handle.destroy().unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn zero_interval_engine_is_refused() {
    let carousel = Arc::new(MemoryCarousel::new(vec![Slide::default(); 3]));
    let config = AutoplayConfig {
        resolution: ClockResolution::Low,
        ..config(0)
    };
    let result = AutoplayEngine::new(config, AutoplayParts::new(carousel.clone()));
    assert!(result.is_err());
    assert_eq!(carousel.advances(), 0);
}
