//! Listener storage.

use canopy_types::Value;
use std::fmt;
use std::rc::Rc;

/// Name of the catch-all event.
pub const ALL: &str = "all";

/// A listener. Identity (for removal) is the `Rc` allocation.
pub type Handler<H> = Rc<dyn Fn(&mut H, &[Value])>;

/// Wraps a closure into a [`Handler`].
pub fn handler<H, F>(f: F) -> Handler<H>
where
    F: Fn(&mut H, &[Value]) + 'static,
{
    Rc::new(f)
}

/// Splits an event list on whitespace, skipping empty segments.
pub fn split_events(events: &str) -> impl Iterator<Item = &str> {
    events.split_whitespace()
}

struct Listener<H> {
    event: String,
    handler: Handler<H>,
}

/// Ordered listener registry for a single host.
///
/// Listeners fire in registration order. The same handler may be registered
/// more than once and then fires once per registration.
pub struct EventBus<H> {
    listeners: Vec<Listener<H>>,
}

impl<H> EventBus<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers `handler` for every event named in `events`.
    pub fn on(&mut self, events: &str, handler: Handler<H>) {
        for event in split_events(events) {
            self.listeners.push(Listener {
                event: event.to_string(),
                handler: handler.clone(),
            });
        }
    }

    /// Removes matching listeners and returns how many were dropped.
    pub fn off(&mut self, events: Option<&str>, handler: Option<&Handler<H>>) -> usize {
        let names: Option<Vec<&str>> = events.map(|e| split_events(e).collect());
        let before = self.listeners.len();
        self.listeners.retain(|l| {
            let event_matches = names
                .as_ref()
                .is_none_or(|names| names.contains(&l.event.as_str()));
            let handler_matches = handler.is_none_or(|h| same_handler(h, &l.handler));
            !(event_matches && handler_matches)
        });
        before - self.listeners.len()
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Snapshot of the handlers registered for exactly `event`.
    #[must_use]
    pub fn handlers(&self, event: &str) -> Vec<Handler<H>> {
        self.listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.handler.clone())
            .collect()
    }

    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listeners.iter().any(|l| l.event == event)
    }

    /// Total number of registrations across all events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

fn same_handler<H>(a: &Handler<H>, b: &Handler<H>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl<H> Default for EventBus<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for EventBus<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "events",
                &self.listeners.iter().map(|l| l.event.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
