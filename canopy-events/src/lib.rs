//! Synchronous event emitter for Canopy.
//!
//! [`EventBus`] stores listeners; the [`Events`] trait gives any host type
//! that owns a bus the familiar `on` / `off` / `trigger` surface. Dispatch is
//! same-thread and runs to completion before `trigger` returns. Listeners
//! receive the host as `&mut H`, which is how a handler reaches "its"
//! instance.
//!
//! Event strings may name several events separated by whitespace. Listeners
//! registered for [`ALL`] see every event, with the event name prepended to
//! the arguments.

mod bus;

pub use bus::{ALL, EventBus, Handler, handler, split_events};

use canopy_types::Value;
use tracing::trace;

/// Publish/subscribe capability for a host that owns an [`EventBus`].
pub trait Events: Sized + 'static {
    fn event_bus(&self) -> &EventBus<Self>;
    fn event_bus_mut(&mut self) -> &mut EventBus<Self>;

    /// Registers `handler` for each whitespace-separated event in `events`.
    fn on(&mut self, events: &str, handler: Handler<Self>) -> &mut Self {
        self.event_bus_mut().on(events, handler);
        self
    }

    /// Wraps `f` into a [`Handler`], registers it and returns it so the
    /// caller can later pass it to [`Events::off`].
    fn listen<F>(&mut self, events: &str, f: F) -> Handler<Self>
    where
        F: Fn(&mut Self, &[Value]) + 'static,
    {
        let h = handler(f);
        self.event_bus_mut().on(events, h.clone());
        h
    }

    /// Removes listeners. `None` for `events` means every event; `None` for
    /// `handler` means every handler of the selected events.
    fn off(&mut self, events: Option<&str>, handler: Option<&Handler<Self>>) -> &mut Self {
        self.event_bus_mut().off(events, handler);
        self
    }

    /// Emits each whitespace-separated event in `events` with `args`.
    ///
    /// The listener list is captured before dispatch: listeners added while
    /// an event is being delivered first hear the next one, and listeners
    /// removed mid-delivery still receive the current one.
    fn trigger(&mut self, events: &str, args: &[Value]) -> &mut Self {
        for event in split_events(events) {
            let direct = self.event_bus().handlers(event);
            trace!(event, listeners = direct.len(), "dispatching event");
            for h in direct {
                h(self, args);
            }

            if event == ALL {
                continue;
            }
            let all = self.event_bus().handlers(ALL);
            if all.is_empty() {
                continue;
            }
            let mut with_name = Vec::with_capacity(args.len() + 1);
            with_name.push(Value::from(event));
            with_name.extend_from_slice(args);
            for h in all {
                h(self, &with_name);
            }
        }
        self
    }
}
