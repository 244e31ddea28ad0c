//! Guest-side bindings for the polygon overlay plugin.
//!
//! [`Polygon`] is the single entry point: it forwards typed commands to the
//! host and fans host events out to subscribers registered with
//! [`Polygon::on`]. The host itself is reached through the
//! [`InvokeTransport`] and [`EventSource`] seams.

use std::sync::Arc;

use shared::{
    domain::{Point, PolygonId},
    error::ProtocolError,
    protocol::{CommandResponse, HostEvent},
};
use tracing::info;

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod intake;
pub mod loopback;
pub mod transport;

pub use commands::CommandProxy;
pub use config::{load_settings, PolygonSettings};
pub use error::{PolygonError, Result};
pub use events::{Callback, EventRegistry, PolygonEvent};
pub use intake::EventIntake;
pub use loopback::LoopbackHost;
pub use transport::{EventSource, InvokeTransport, MissingTransport, TransportError};

/// Command proxy plus event registry for one host connection.
///
/// Create one per process at startup and keep it for the lifetime of the
/// UI; the host listeners it attaches are never detached.
pub struct Polygon {
    commands: CommandProxy,
    events: Arc<EventRegistry>,
    intake: EventIntake,
}

impl Polygon {
    /// Must be called from within a Tokio runtime.
    pub fn attach<H>(host: Arc<H>, settings: PolygonSettings) -> Self
    where
        H: InvokeTransport + EventSource + 'static,
    {
        let events = Arc::new(EventRegistry::new());
        let intake = EventIntake::attach(Arc::clone(&events), host.as_ref(), &settings);
        info!(
            plugin = %settings.plugin_name,
            listeners = intake.listener_count(),
            "polygon bindings attached"
        );
        let commands = CommandProxy::new(host, settings);
        Self {
            commands,
            events,
            intake,
        }
    }

    pub fn commands(&self) -> &CommandProxy {
        &self.commands
    }

    pub fn events(&self) -> &Arc<EventRegistry> {
        &self.events
    }

    pub fn intake(&self) -> &EventIntake {
        &self.intake
    }

    pub async fn register(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.commands.register(id).await
    }

    pub async fn register_all<I, S>(&self, ids: I) -> Result<CommandResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<PolygonId>,
    {
        self.commands.register_all(ids).await
    }

    pub async fn remove(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.commands.remove(id).await
    }

    pub async fn clear(&self) -> Result<CommandResponse> {
        self.commands.clear().await
    }

    pub async fn show(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.commands.show(id).await
    }

    pub async fn hide(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.commands.hide(id).await
    }

    pub async fn update<P>(
        &self,
        id: impl Into<PolygonId>,
        points: Vec<P>,
    ) -> Result<CommandResponse>
    where
        P: Into<Point>,
    {
        self.commands.update(id, points).await
    }

    pub fn on<E: PolygonEvent>(&self, callback: Callback<E::Payload>) {
        self.events.on::<E>(callback);
    }

    pub fn off<E: PolygonEvent>(&self, callback: &Callback<E::Payload>) {
        self.events.off::<E>(callback);
    }

    pub fn on_named(
        &self,
        name: &str,
        callback: Callback<HostEvent>,
    ) -> std::result::Result<(), ProtocolError> {
        self.events.on_named(name, callback)
    }

    pub fn off_named(
        &self,
        name: &str,
        callback: &Callback<HostEvent>,
    ) -> std::result::Result<(), ProtocolError> {
        self.events.off_named(name, callback)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
