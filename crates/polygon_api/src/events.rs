//! Subscriber registry for host events.
//!
//! Subscriptions are keyed by [`EventName`]. The typed API binds each name
//! to its payload type through a marker implementing [`PolygonEvent`], so a
//! `Drag` subscriber can only ever be handed a [`DragPayload`].

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    error::ProtocolError,
    protocol::{DragPayload, ErrorPayload, EventName, HostEvent, PositionPayload, WheelPayload},
};
use tracing::trace;

pub type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

pub trait PolygonEvent: 'static {
    const NAME: EventName;
    type Payload: 'static;

    fn payload(event: &HostEvent) -> Option<&Self::Payload>;
}

macro_rules! polygon_event {
    ($marker:ident, $payload:ty) => {
        pub struct $marker;

        impl PolygonEvent for $marker {
            const NAME: EventName = EventName::$marker;
            type Payload = $payload;

            fn payload(event: &HostEvent) -> Option<&$payload> {
                match event {
                    HostEvent::$marker(payload) => Some(payload),
                    _ => None,
                }
            }
        }
    };
}

polygon_event!(LeftClick, PositionPayload);
polygon_event!(DoubleClick, PositionPayload);
polygon_event!(RightClick, PositionPayload);
polygon_event!(Drag, DragPayload);
polygon_event!(MouseMove, PositionPayload);
polygon_event!(Wheel, WheelPayload);
polygon_event!(Error, ErrorPayload);

#[derive(Clone)]
struct Subscriber {
    /// Address of the caller's `Arc`, used for removal.
    key: usize,
    invoke: Arc<dyn Fn(&HostEvent) + Send + Sync>,
}

fn callback_key<P: ?Sized>(callback: &Arc<P>) -> usize {
    Arc::as_ptr(callback) as *const () as usize
}

pub struct EventRegistry {
    subscribers: Mutex<HashMap<EventName, Vec<Subscriber>>>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        let subscribers = EventName::ALL
            .into_iter()
            .map(|name| (name, Vec::new()))
            .collect();
        Self {
            subscribers: Mutex::new(subscribers),
        }
    }

    /// Appends `callback` to the subscribers of `E`. Registering the same
    /// callback twice makes it fire twice per event.
    pub fn on<E: PolygonEvent>(&self, callback: Callback<E::Payload>) {
        let key = callback_key(&callback);
        let invoke: Arc<dyn Fn(&HostEvent) + Send + Sync> =
            Arc::new(move |event: &HostEvent| {
                if let Some(payload) = E::payload(event) {
                    callback(payload);
                }
            });
        self.push(E::NAME, Subscriber { key, invoke });
    }

    /// Drops every registration of `callback` for `E`; unknown callbacks are ignored.
    pub fn off<E: PolygonEvent>(&self, callback: &Callback<E::Payload>) {
        self.remove(E::NAME, callback_key(callback));
    }

    /// Name-checked variant of [`EventRegistry::on`]. The callback receives the
    /// whole event, whose variant always matches `name`.
    pub fn on_named(
        &self,
        name: &str,
        callback: Callback<HostEvent>,
    ) -> Result<(), ProtocolError> {
        let name: EventName = name.parse()?;
        let key = callback_key(&callback);
        self.push(
            name,
            Subscriber {
                key,
                invoke: callback,
            },
        );
        Ok(())
    }

    pub fn off_named(
        &self,
        name: &str,
        callback: &Callback<HostEvent>,
    ) -> Result<(), ProtocolError> {
        let name: EventName = name.parse()?;
        self.remove(name, callback_key(callback));
        Ok(())
    }

    /// Invokes the current subscribers of the event's name in registration
    /// order and returns how many ran. The list is snapshotted first, so
    /// `on`/`off` calls made by a subscriber only affect later dispatches.
    /// A panicking subscriber is not caught and skips the rest.
    pub fn dispatch(&self, event: &HostEvent) -> usize {
        let name = event.name();
        let snapshot = self.lock().get(&name).cloned().unwrap_or_default();

        trace!(event = %name, subscribers = snapshot.len(), "dispatching host event");
        for subscriber in &snapshot {
            (subscriber.invoke)(event);
        }
        snapshot.len()
    }

    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.lock().get(&name).map_or(0, Vec::len)
    }

    fn push(&self, name: EventName, subscriber: Subscriber) {
        let mut guard = self.lock();
        let list = guard.entry(name).or_default();
        list.push(subscriber);
        trace!(event = %name, subscribers = list.len(), "subscriber added");
    }

    fn remove(&self, name: EventName, key: usize) {
        let mut guard = self.lock();
        let list = guard.entry(name).or_default();
        let before = list.len();
        list.retain(|subscriber| subscriber.key != key);
        trace!(
            event = %name,
            removed = before - list.len(),
            "subscriber removed"
        );
    }

    // Callbacks never run under the lock, so poisoning cannot leave a half-edited list.
    fn lock(&self) -> MutexGuard<'_, HashMap<EventName, Vec<Subscriber>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
