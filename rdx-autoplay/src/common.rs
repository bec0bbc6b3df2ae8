//! Contains common, primitive types shared across the autoplay components.
//!
//! This module defines the key type used to identify bound listeners and the
//! closed set of event triggers the controller can listen for. Using distinct
//! types keeps the listener registry honest about what it may dispatch.

use slotmap::new_key_type;

new_key_type! {
    /// Uniquely and safely identifies a listener bound by the controller.
    ///
    /// Returned by the listener registry when a handler is bound to a set of
    /// triggers. Keys are never reused, so a stale id cannot unbind a newer
    /// listener.
    pub struct ListenerId;
}

/// Every raw event the autoplay controller may subscribe to.
///
/// Pointer, focus and click triggers originate from the carousel's elements;
/// move, scroll and refresh triggers originate from the carousel itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    ToggleClick,
    Move,
    Scroll,
    Refresh,
}

/// The element (or channel) a listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The carousel root element.
    Root,
    /// The play/pause toggle button.
    Toggle,
    /// The carousel's own event channel.
    Carousel,
}
