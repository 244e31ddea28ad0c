//! Permanent listeners that feed host event channels into an [`EventRegistry`].

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use futures::StreamExt;
use shared::protocol::{EventName, HostEvent};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::{config::PolygonSettings, events::EventRegistry, transport::EventSource};

pub struct EventIntake {
    listeners: Vec<(EventName, JoinHandle<()>)>,
}

impl EventIntake {
    /// Subscribes to all seven channels and spawns one listener task per
    /// channel. Must be called from within a Tokio runtime.
    pub fn attach(
        registry: Arc<EventRegistry>,
        source: &dyn EventSource,
        settings: &PolygonSettings,
    ) -> Self {
        let listeners = EventName::ALL
            .into_iter()
            .map(|name| {
                let channel = settings.channel(name);
                let mut stream = source.listen(&channel);
                let registry = Arc::clone(&registry);
                let handle = tokio::spawn(async move {
                    while let Some(raw) = stream.next().await {
                        let event = match HostEvent::decode(name, raw) {
                            Ok(event) => event,
                            Err(err) => {
                                warn!(%channel, error = %err, "dropping undecodable host event");
                                continue;
                            }
                        };
                        // A panicking subscriber ends this dispatch but not the listener.
                        let dispatched =
                            panic::catch_unwind(AssertUnwindSafe(|| registry.dispatch(&event)));
                        if dispatched.is_err() {
                            error!(%channel, "subscriber panicked; remaining subscribers skipped");
                        }
                    }
                    debug!(%channel, "host event channel closed");
                });
                debug!(event = %name, channel = %settings.channel(name), "host event listener attached");
                (name, handle)
            })
            .collect();

        Self { listeners }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, name: EventName) -> bool {
        self.listeners
            .iter()
            .any(|(listened, handle)| *listened == name && !handle.is_finished())
    }

    /// Stops every listener. Only meant for embedders tearing down their runtime.
    pub fn shutdown(self) {
        for (_, handle) in self.listeners {
            handle.abort();
        }
    }
}
