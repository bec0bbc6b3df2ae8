//! A scoped listener registry: what the controller is listening to, and why.

use crate::common::{ListenerId, Target, Trigger};
use crate::events::SystemEvent;
use slotmap::SlotMap;
use tokio::sync::broadcast;

/// The controller reactions a listener can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Update the hover reason from enter/leave.
    Hover,
    /// Update the focus reason from focus in/out.
    Focus,
    /// Flip between play and explicit stop.
    Toggle,
    /// Restart the current cycle from zero.
    Rewind,
    /// Re-read the interval for the slide just moved to.
    ResetInterval,
}

#[derive(Debug)]
pub(crate) struct Binding {
    pub target: Target,
    pub triggers: Vec<Trigger>,
    pub handler: Handler,
}

/// Listeners bound by one controller. Everything is unbound on teardown.
#[derive(Debug)]
pub(crate) struct Bindings {
    listeners: SlotMap<ListenerId, Binding>,
    system_event_sender: broadcast::Sender<SystemEvent>,
}

impl Bindings {
    pub(crate) fn new(system_event_sender: broadcast::Sender<SystemEvent>) -> Self {
        Self {
            listeners: SlotMap::with_key(),
            system_event_sender,
        }
    }

    /// Binds `handler` to `triggers` raised by `target`.
    pub(crate) fn bind(&mut self, target: Target, triggers: &[Trigger], handler: Handler) -> ListenerId {
        let id = self.listeners.insert(Binding {
            target,
            triggers: triggers.to_vec(),
            handler,
        });
        self.system_event_sender
            .send(SystemEvent::ListenerAdded { id })
            .ok();
        id
    }

    /// Binds `handler` to events from the carousel's own channel.
    pub(crate) fn on(&mut self, triggers: &[Trigger], handler: Handler) -> ListenerId {
        self.bind(Target::Carousel, triggers, handler)
    }

    /// Handlers listening for `trigger` on `target`.
    ///
    /// Handlers sharing a trigger commute, so the order is not significant.
    pub(crate) fn handlers_for(&self, target: Target, trigger: Trigger) -> Vec<Handler> {
        self.listeners
            .values()
            .filter(|binding| binding.target == target && binding.triggers.contains(&trigger))
            .map(|binding| binding.handler)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Removes every listener.
    pub(crate) fn unbind_all(&mut self) {
        for (id, _) in self.listeners.drain() {
            self.system_event_sender
                .send(SystemEvent::ListenerRemoved { id })
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_target_and_unbinds_everything() {
        let (system_tx, mut system_rx) = broadcast::channel(16);
        let mut bindings = Bindings::new(system_tx);
        let rewind = bindings.on(&[Trigger::Move, Trigger::Scroll, Trigger::Refresh], Handler::Rewind);
        bindings.on(&[Trigger::Move], Handler::ResetInterval);
        bindings.bind(Target::Root, &[Trigger::PointerEnter, Trigger::PointerLeave], Handler::Hover);

        assert_eq!(
            bindings.handlers_for(Target::Carousel, Trigger::Move),
            vec![Handler::Rewind, Handler::ResetInterval]
        );
        assert_eq!(bindings.handlers_for(Target::Root, Trigger::PointerLeave), vec![Handler::Hover]);
        assert!(bindings.handlers_for(Target::Root, Trigger::FocusIn).is_empty());
        assert!(bindings.handlers_for(Target::Toggle, Trigger::PointerLeave).is_empty());

        match system_rx.try_recv().unwrap() {
            SystemEvent::ListenerAdded { id } => assert_eq!(id, rewind),
            other => panic!("unexpected event: {other:?}"),
        }

        bindings.unbind_all();
        assert_eq!(bindings.len(), 0);
        assert!(bindings.handlers_for(Target::Carousel, Trigger::Move).is_empty());
        let removed = std::iter::from_fn(|| system_rx.try_recv().ok())
            .filter(|event| matches!(event, SystemEvent::ListenerRemoved { .. }))
            .count();
        assert_eq!(removed, 3);
    }
}
