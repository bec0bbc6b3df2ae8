//! The suspend-reason state machine behind autoplay's play/pause decisions.
//!
//! Three independent reasons can hold autoplay back: an explicit stop, the
//! pointer hovering the carousel, and focus inside the carousel. An explicit
//! stop always wins. Hover and focus only ever cause transient pauses, and
//! when both are set and one clears, the decision is re-derived from the one
//! that remains.

/// A raw signal that may change a suspend reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Hover(bool),
    Focus(bool),
    ToggleClick,
}

/// What the controller should do in response to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Play,
    Pause { stop: bool },
    /// Leave the running state untouched.
    Hold,
}

/// The observable state of autoplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    /// Paused without a recorded reason: not mounted yet, or too few slides.
    Idle,
    Running,
    PausedByHover,
    PausedByFocus,
    /// Explicitly stopped by the user or the API.
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuspendReasons {
    stopped: bool,
    hovered: bool,
    focused: bool,
}

impl SuspendReasons {
    pub fn new(stopped: bool) -> Self {
        Self {
            stopped,
            ..Self::default()
        }
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Records a signal and decides what should happen next.
    ///
    /// Hover and focus changes never touch `stopped`; the toggle button asks
    /// to play when stopped and to stop otherwise.
    pub fn reduce(&mut self, signal: Signal) -> Directive {
        match signal {
            Signal::Hover(hovered) => {
                self.hovered = hovered;
                self.auto_toggle()
            }
            Signal::Focus(focused) => {
                self.focused = focused;
                self.auto_toggle()
            }
            Signal::ToggleClick if self.stopped => Directive::Play,
            Signal::ToggleClick => Directive::Pause { stop: true },
        }
    }

    /// Applied when playback actually starts: every reason is cleared.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Applied on every pause request.
    pub fn set_stopped(&mut self, stop: bool) {
        self.stopped = stop;
    }

    /// The state to report while the timer is paused.
    pub fn paused_state(&self) -> AutoplayState {
        if self.stopped {
            AutoplayState::Stopped
        } else if self.hovered {
            AutoplayState::PausedByHover
        } else if self.focused {
            AutoplayState::PausedByFocus
        } else {
            AutoplayState::Idle
        }
    }

    fn auto_toggle(&self) -> Directive {
        if self.stopped {
            Directive::Hold
        } else if self.hovered || self.focused {
            Directive::Pause { stop: false }
        } else {
            Directive::Play
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_pauses_transiently_and_leaving_plays() {
        let mut reasons = SuspendReasons::default();
        assert_eq!(reasons.reduce(Signal::Hover(true)), Directive::Pause { stop: false });
        assert!(!reasons.stopped());
        assert_eq!(reasons.paused_state(), AutoplayState::PausedByHover);
        assert_eq!(reasons.reduce(Signal::Hover(false)), Directive::Play);
    }

    #[test]
    fn explicit_stop_wins_over_hover_and_focus() {
        let mut reasons = SuspendReasons::new(true);
        assert_eq!(reasons.reduce(Signal::Hover(true)), Directive::Hold);
        assert_eq!(reasons.reduce(Signal::Focus(true)), Directive::Hold);
        assert_eq!(reasons.reduce(Signal::Hover(false)), Directive::Hold);
        assert_eq!(reasons.reduce(Signal::Focus(false)), Directive::Hold);
        assert!(reasons.stopped());
        assert_eq!(reasons.paused_state(), AutoplayState::Stopped);
    }

    #[test]
    fn overlap_rederives_from_the_remaining_reason() {
        let mut reasons = SuspendReasons::default();
        reasons.reduce(Signal::Hover(true));
        reasons.reduce(Signal::Focus(true));
        assert_eq!(reasons.reduce(Signal::Hover(false)), Directive::Pause { stop: false });
        assert_eq!(reasons.paused_state(), AutoplayState::PausedByFocus);
        assert_eq!(reasons.reduce(Signal::Focus(false)), Directive::Play);
        assert_eq!(reasons.paused_state(), AutoplayState::Idle);
    }

    #[test]
    fn toggle_click_flips_between_play_and_stop() {
        let mut reasons = SuspendReasons::default();
        assert_eq!(reasons.reduce(Signal::ToggleClick), Directive::Pause { stop: true });
        reasons.set_stopped(true);
        assert_eq!(reasons.reduce(Signal::ToggleClick), Directive::Play);
    }

    #[test]
    fn clear_drops_every_reason() {
        let mut reasons = SuspendReasons::new(true);
        reasons.reduce(Signal::Hover(true));
        reasons.reduce(Signal::Focus(true));
        reasons.clear();
        assert_eq!(reasons, SuspendReasons::default());
        assert_eq!(reasons.paused_state(), AutoplayState::Idle);
    }
}
