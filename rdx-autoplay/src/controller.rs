//! The autoplay controller: suspend reasons in, scheduler commands out.

use crate::carousel::{AutoplayParts, Carousel, ToggleButton, ToggleState};
use crate::common::{Target, Trigger};
use crate::components::binding::{Bindings, Handler};
use crate::components::interval::{IntervalCallback, IntervalScheduler, ProgressCallback};
use crate::components::suspend::{AutoplayState, Directive, Signal, SuspendReasons};
use crate::config::AutoplayConfig;
use crate::events::{AutoplayEvent, CarouselEvent, InputEvent, SystemEvent};
use crate::time::{FrameSender, TickEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, trace};

/// A point-in-time view of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoplayStatus {
    pub state: AutoplayState,
    pub paused: bool,
    /// Progress through the current slide's interval, in `0..=1`.
    pub progress: f64,
    /// The interval in effect for the current slide.
    pub interval: Duration,
}

/// Drives a carousel's autoplay.
///
/// The controller owns the interval scheduler and is the only thing allowed to
/// command it. Raw input and carousel events are routed through the listeners
/// bound on `mount`; everything here runs synchronously, so callers decide the
/// order events are applied in.
pub struct AutoplayController {
    config: Arc<AutoplayConfig>,
    carousel: Arc<dyn Carousel>,
    toggle: Option<Arc<dyn ToggleButton>>,
    interval: IntervalScheduler,
    reasons: SuspendReasons,
    bindings: Bindings,
    event_sender: broadcast::Sender<AutoplayEvent>,
    mounted: bool,
}

impl AutoplayController {
    /// Creates an unmounted controller, or fails if `config` does not validate.
    ///
    /// Progress is forwarded to the progress bar and broadcast as
    /// `AutoplayEvent::Playing`; every completed interval advances the carousel.
    pub fn new(
        config: Arc<AutoplayConfig>,
        parts: AutoplayParts,
        frames: FrameSender,
        event_sender: broadcast::Sender<AutoplayEvent>,
        system_event_sender: broadcast::Sender<SystemEvent>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let bar = parts.bar.clone();
        let events = event_sender.clone();
        let on_progress: ProgressCallback = Box::new(move |progress: f64| {
            if let Some(bar) = &bar {
                bar.set_progress(progress);
            }
            events.send(AutoplayEvent::Playing { progress }).ok();
        });

        let carousel = parts.carousel.clone();
        let on_interval: IntervalCallback = Box::new(move || carousel.advance());

        let interval = IntervalScheduler::new(
            config.default_interval(),
            frames,
            on_progress,
            on_interval,
        );

        Ok(Self {
            reasons: SuspendReasons::new(config.autoplay.starts_stopped()),
            config,
            carousel: parts.carousel,
            toggle: parts.toggle,
            interval,
            bindings: Bindings::new(system_event_sender),
            event_sender,
            mounted: false,
        })
    }

    /// Installs autoplay, unless it is configured off.
    ///
    /// Binds hover, focus and toggle listeners as configured, subscribes to
    /// carousel movement, and starts playing unless configured to start
    /// stopped. Mounting twice does nothing.
    pub fn mount(&mut self) {
        if !self.config.autoplay.is_enabled() {
            debug!("Autoplay is disabled; nothing to mount.");
            return;
        }
        if self.mounted {
            return;
        }
        self.listen();
        if let Some(toggle) = &self.toggle {
            toggle.link_controls();
        }
        self.mounted = true;
        if !self.reasons.stopped() {
            self.play();
        }
        self.update();
        debug!(
            "Autoplay mounted with {} listeners, {:?}.",
            self.bindings.len(),
            self.state()
        );
    }

    /// Starts or resumes playback and clears every suspend reason.
    ///
    /// Does nothing while running, or if the carousel has too few slides.
    pub fn play(&mut self) {
        if !self.interval.is_paused() || !self.carousel.is_enough() {
            return;
        }
        let interval = self.slide_interval(self.carousel.index());
        self.interval.set(interval);
        self.interval.start(!self.config.reset_progress);
        self.reasons.clear();
        self.update();
        debug!("Autoplay playing with a {:?} interval.", interval);
        self.event_sender.send(AutoplayEvent::Play).ok();
    }

    /// Suspends playback. With `stop`, hover and focus can no longer resume it.
    ///
    /// Only emits `AutoplayEvent::Pause` if the timer was actually running.
    pub fn pause(&mut self, stop: bool) {
        self.reasons.set_stopped(stop);
        self.update();
        if !self.interval.is_paused() {
            self.interval.pause();
            debug!("Autoplay paused (stop: {}).", stop);
            self.event_sender.send(AutoplayEvent::Pause).ok();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.interval.is_paused()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether autoplay is explicitly stopped.
    pub fn is_stopped(&self) -> bool {
        self.reasons.stopped()
    }

    pub fn state(&self) -> AutoplayState {
        if self.interval.is_paused() {
            self.reasons.paused_state()
        } else {
            AutoplayState::Running
        }
    }

    pub fn status(&self) -> AutoplayStatus {
        AutoplayStatus {
            state: self.state(),
            paused: self.interval.is_paused(),
            progress: self.interval.progress(),
            interval: self.interval.duration(),
        }
    }

    /// Applies a raw input event through whichever listeners are bound to it.
    pub fn handle_input(&mut self, event: InputEvent) {
        for handler in self.bindings.handlers_for(event.target(), event.trigger()) {
            let signal = match handler {
                Handler::Hover => Signal::Hover(event == InputEvent::PointerEnter),
                Handler::Focus => Signal::Focus(event == InputEvent::FocusIn),
                Handler::Toggle => Signal::ToggleClick,
                Handler::Rewind | Handler::ResetInterval => continue,
            };
            self.apply(signal);
        }
    }

    /// Resynchronizes the timer with a carousel event.
    ///
    /// Any movement restarts the cycle from zero; moving to a new slide also
    /// picks up that slide's interval.
    pub fn handle_carousel_event(&mut self, event: CarouselEvent) {
        let trigger: Trigger = event.trigger();
        for handler in self.bindings.handlers_for(Target::Carousel, trigger) {
            match (handler, event) {
                (Handler::Rewind, _) => self.interval.rewind(),
                (Handler::ResetInterval, CarouselEvent::Moved { index }) => {
                    let interval = self.slide_interval(index);
                    trace!("Slide {} uses a {:?} interval.", index, interval);
                    self.interval.set(interval);
                }
                _ => {}
            }
        }
    }

    /// Waits for the scheduler's next frame; pends forever while paused.
    pub async fn next_frame(&mut self) -> Option<Arc<TickEvent>> {
        self.interval.next_frame().await
    }

    /// Advances the scheduler to `now`. Returns `true` if the carousel was
    /// told to move on.
    pub fn process_frame(&mut self, now: Instant) -> bool {
        let completed = self.interval.process_frame(now);
        if completed {
            debug!("Interval elapsed; advancing the carousel.");
        }
        completed
    }

    /// Tears autoplay down: the timer is cancelled and every listener unbound.
    pub fn destroy(&mut self) {
        self.interval.cancel();
        self.bindings.unbind_all();
        self.mounted = false;
        debug!("Autoplay destroyed.");
    }

    fn listen(&mut self) {
        if self.config.pause_on_hover {
            self.bindings.bind(
                Target::Root,
                &[Trigger::PointerEnter, Trigger::PointerLeave],
                Handler::Hover,
            );
        }
        if self.config.pause_on_focus {
            self.bindings
                .bind(Target::Root, &[Trigger::FocusIn, Trigger::FocusOut], Handler::Focus);
        }
        if self.toggle.is_some() {
            self.bindings
                .bind(Target::Toggle, &[Trigger::ToggleClick], Handler::Toggle);
        }
        self.bindings.on(
            &[Trigger::Move, Trigger::Scroll, Trigger::Refresh],
            Handler::Rewind,
        );
        self.bindings.on(&[Trigger::Move], Handler::ResetInterval);
    }

    fn apply(&mut self, signal: Signal) {
        match self.reasons.reduce(signal) {
            Directive::Play => self.play(),
            Directive::Pause { stop } => self.pause(stop),
            Directive::Hold => trace!("Ignoring {:?} while stopped.", signal),
        }
    }

    fn update(&self) {
        if let Some(toggle) = &self.toggle {
            toggle.update(ToggleState::from_stopped(self.reasons.stopped()));
        }
    }

    fn slide_interval(&self, index: usize) -> Duration {
        self.carousel
            .interval_attribute(index)
            .as_deref()
            .and_then(parse_interval)
            .unwrap_or_else(|| self.config.default_interval())
    }
}

/// Reads a per-slide override as a positive number of milliseconds.
fn parse_interval(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok())
}

impl std::fmt::Debug for AutoplayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoplayController")
            .field("interval", &self.interval)
            .field("reasons", &self.reasons)
            .field("listeners", &self.bindings.len())
            .field("mounted", &self.mounted)
            .finish()
    }
}
