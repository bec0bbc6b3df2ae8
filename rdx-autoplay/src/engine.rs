//! The event loop that runs an `AutoplayController`.

use crate::carousel::AutoplayParts;
use crate::config::AutoplayConfig;
use crate::controller::{AutoplayController, AutoplayStatus};
use crate::events::{AutoplayEvent, CarouselEvent, InputEvent, SystemEvent};
use crate::time::{FrameSender, SystemClock, TickEvent};
use anyhow::anyhow;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, trace, warn};

/// Requests sent to a running engine through an `AutoplayHandle`.
#[derive(Debug)]
enum Command {
    Input(InputEvent),
    Play,
    Pause { stop: bool },
    Status(oneshot::Sender<AutoplayStatus>),
    Destroy,
}

/// One unit of work picked by the event loop.
enum Step {
    Shutdown,
    Command(Command),
    Carousel(CarouselEvent),
    Frame(Arc<TickEvent>),
    Idle,
}

/// A cloneable handle for talking to a running `AutoplayEngine`.
///
/// Every call fails once the engine has stopped.
#[derive(Debug, Clone)]
pub struct AutoplayHandle {
    command_sender: mpsc::UnboundedSender<Command>,
}

impl AutoplayHandle {
    /// Forwards a raw hover, focus or toggle-click event.
    pub fn input(&self, event: InputEvent) -> anyhow::Result<()> {
        self.send(Command::Input(event))
    }

    pub fn play(&self) -> anyhow::Result<()> {
        self.send(Command::Play)
    }

    pub fn pause(&self, stop: bool) -> anyhow::Result<()> {
        self.send(Command::Pause { stop })
    }

    /// Tears autoplay down and ends the engine's loop.
    pub fn destroy(&self) -> anyhow::Result<()> {
        self.send(Command::Destroy)
    }

    pub async fn status(&self) -> anyhow::Result<AutoplayStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Status(reply_tx))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("autoplay engine stopped before answering"))
    }

    fn send(&self, command: Command) -> anyhow::Result<()> {
        self.command_sender
            .send(command)
            .map_err(|_| anyhow!("autoplay engine is not running"))
    }
}

/// Owns the frame clock and the controller, and drives both on one task.
///
/// Commands, carousel events and frames are handled one at a time in that
/// priority order, so the controller never needs a lock. Navigation caused by
/// a completed interval comes back as a carousel event on a later iteration,
/// after the scheduler has already begun its next cycle.
pub struct AutoplayEngine {
    config: Arc<AutoplayConfig>,
    controller: AutoplayController,
    tick_sender: FrameSender,
    event_sender: broadcast::Sender<AutoplayEvent>,
    system_event_sender: broadcast::Sender<SystemEvent>,
    carousel_rx: broadcast::Receiver<CarouselEvent>,
    command_sender: mpsc::UnboundedSender<Command>,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

impl AutoplayEngine {
    /// Creates a new `AutoplayEngine` for the given carousel parts.
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: AutoplayConfig, parts: AutoplayParts) -> anyhow::Result<Self> {
        const CHANNEL_CAPACITY: usize = 256;
        let (tick_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (system_event_sender, _) = broadcast::channel(64);
        let (command_sender, command_rx) = mpsc::unbounded_channel();

        let config = Arc::new(config);
        let carousel_rx = parts.carousel.subscribe();
        let controller = AutoplayController::new(
            config.clone(),
            parts,
            tick_sender.clone(),
            event_sender.clone(),
            system_event_sender.clone(),
        )?;

        Ok(Self {
            config,
            controller,
            tick_sender,
            event_sender,
            system_event_sender,
            carousel_rx,
            command_sender,
            command_rx,
        })
    }

    pub fn handle(&self) -> AutoplayHandle {
        AutoplayHandle {
            command_sender: self.command_sender.clone(),
        }
    }

    /// Subscribes to the `AutoplayEvent` stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<AutoplayEvent> {
        self.event_sender.subscribe()
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }

    /// Runs until Ctrl+C or `AutoplayHandle::destroy`.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs until `shutdown` resolves or `AutoplayHandle::destroy` is called.
    ///
    /// This method will:
    /// 1. Spawn the `SystemClock` task.
    /// 2. Mount the controller.
    /// 3. Dispatch commands, carousel events and frames until told to stop.
    /// 4. Destroy the controller and stop the clock.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("AutoplayEngine starting up...");
        let (shutdown_tx, _) = broadcast::channel(1);

        let clock = SystemClock::new(self.config.resolution.clone(), self.tick_sender.clone());
        let clock_task = tokio::spawn(clock.run(shutdown_tx.subscribe()));

        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: tokio::time::Instant::now(),
            })
            .ok();
        self.controller.mount();

        tokio::pin!(shutdown);
        let mut carousel_open = true;
        loop {
            let step = tokio::select! {
                biased;
                _ = &mut shutdown => Step::Shutdown,
                Some(command) = self.command_rx.recv() => Step::Command(command),
                event = self.carousel_rx.recv(), if carousel_open => match event {
                    Ok(event) => Step::Carousel(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} carousel events.", skipped);
                        Step::Idle
                    }
                    Err(RecvError::Closed) => {
                        warn!("Carousel event channel closed.");
                        carousel_open = false;
                        Step::Idle
                    }
                },
                Some(tick) = self.controller.next_frame() => Step::Frame(tick),
            };

            match step {
                Step::Shutdown | Step::Command(Command::Destroy) => break,
                Step::Command(command) => self.execute(command),
                Step::Carousel(event) => {
                    trace!("Carousel event: {:?}", event);
                    self.controller.handle_carousel_event(event);
                }
                Step::Frame(tick) => {
                    self.controller.process_frame(tick.timestamp);
                }
                Step::Idle => {}
            }
        }

        info!("Shutting down autoplay...");
        self.controller.destroy();
        // The clock holds its receiver until it exits, so a failed send
        // means it has already finished.
        shutdown_tx.send(()).ok();
        clock_task.await?;
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("AutoplayEngine has shut down.");
        Ok(())
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Input(event) => self.controller.handle_input(event),
            Command::Play => self.controller.play(),
            Command::Pause { stop } => self.controller.pause(stop),
            Command::Status(reply) => {
                reply.send(self.controller.status()).ok();
            }
            Command::Destroy => {}
        }
    }
}
