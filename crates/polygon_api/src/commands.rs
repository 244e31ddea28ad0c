//! Typed async wrappers, one per remote polygon operation.

use std::sync::Arc;

use serde_json::Value;
use shared::{
    domain::{Point, PolygonId, Vertices},
    protocol::{CommandResponse, PolygonCommand},
};
use tracing::{debug, warn};

use crate::{
    config::PolygonSettings,
    error::{PolygonError, Result},
    transport::{InvokeTransport, TransportError},
};

/// Each call issues exactly one invocation and resolves to the host's
/// response. A resolved `ok: false` is an operation failure, not an `Err`.
#[derive(Clone)]
pub struct CommandProxy {
    transport: Arc<dyn InvokeTransport>,
    settings: PolygonSettings,
}

impl CommandProxy {
    pub fn new(transport: Arc<dyn InvokeTransport>, settings: PolygonSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Registers a polygon with default geometry until the first `update`.
    pub async fn register(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.send(PolygonCommand::Register { id: id.into() }).await
    }

    /// Registers a batch. The host answers with one response for the whole batch.
    pub async fn register_all<I, S>(&self, ids: I) -> Result<CommandResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<PolygonId>,
    {
        let ids: Vec<PolygonId> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(PolygonError::EmptyBatch);
        }
        self.send(PolygonCommand::RegisterAll { ids }).await
    }

    pub async fn remove(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.send(PolygonCommand::Remove { id: id.into() }).await
    }

    pub async fn clear(&self) -> Result<CommandResponse> {
        self.send(PolygonCommand::Clear).await
    }

    pub async fn show(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.send(PolygonCommand::Show { id: id.into() }).await
    }

    pub async fn hide(&self, id: impl Into<PolygonId>) -> Result<CommandResponse> {
        self.send(PolygonCommand::Hide { id: id.into() }).await
    }

    /// Replaces the whole vertex list. Fewer than three points fail here,
    /// before anything is sent.
    pub async fn update<P>(
        &self,
        id: impl Into<PolygonId>,
        points: Vec<P>,
    ) -> Result<CommandResponse>
    where
        P: Into<Point>,
    {
        let points = Vertices::try_from(points.into_iter().map(Into::into).collect::<Vec<_>>())?;
        self.send(PolygonCommand::Update {
            id: id.into(),
            points,
        })
        .await
    }

    pub async fn send(&self, command: PolygonCommand) -> Result<CommandResponse> {
        let name = self.settings.command_name(&command);
        debug!(command = %name, "invoking polygon command");

        let response = match self.transport.invoke(&name, command.args()).await {
            Ok(raw) => decode_response(&name, raw)?,
            Err(TransportError::Rejected { command, payload }) => {
                match serde_json::from_value::<CommandResponse>(payload.clone()) {
                    Ok(response) if !response.ok => response,
                    _ => return Err(TransportError::Rejected { command, payload }.into()),
                }
            }
            Err(err) => return Err(err.into()),
        };

        if !response.ok {
            warn!(
                command = %name,
                error = response.error.as_deref().unwrap_or_default(),
                "polygon command failed on host"
            );
        }
        Ok(response)
    }
}

fn decode_response(command: &str, raw: Value) -> Result<CommandResponse> {
    serde_json::from_value(raw).map_err(|source| PolygonError::Response {
        command: command.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
