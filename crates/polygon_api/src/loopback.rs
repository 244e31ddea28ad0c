//! In-process stand-in for the polygon host.
//!
//! Keeps only registration and visibility bookkeeping, no geometry. Failed
//! commands are rejected with the failure response and also reported on the
//! error channel, the same way the native host reports them.

use std::{
    collections::BTreeMap,
    future,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use shared::{
    domain::{Point, PolygonId},
    error::HostError,
    protocol::{CommandResponse, ErrorPayload, HostEvent, PolygonCommand},
};
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, error, warn};

use crate::{
    config::PolygonSettings,
    transport::{EventSource, InvokeTransport, TransportError},
};

/// Events a listener may fall behind by before the oldest are discarded.
pub(crate) const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct LoopbackPolygon {
    pub points: Vec<Point>,
    pub visible: bool,
}

impl Default for LoopbackPolygon {
    fn default() -> Self {
        Self {
            points: vec![Point(0.0, 0.0); 3],
            visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInvocation {
    pub command: String,
    pub args: Value,
}

pub struct LoopbackHost {
    settings: PolygonSettings,
    polygons: Mutex<BTreeMap<PolygonId, LoopbackPolygon>>,
    invocations: Mutex<Vec<RecordedInvocation>>,
    events: broadcast::Sender<(String, Value)>,
}

impl Default for LoopbackHost {
    fn default() -> Self {
        Self::new(PolygonSettings::default())
    }
}

impl LoopbackHost {
    pub fn new(settings: PolygonSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            settings,
            polygons: Mutex::new(BTreeMap::new()),
            invocations: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Publishes a simulated interaction on the event's channel and returns
    /// how many listeners were reached.
    pub fn emit(&self, event: &HostEvent) -> usize {
        self.emit_raw(&self.settings.channel(event.name()), event.payload_value())
    }

    /// Publishes an arbitrary payload on `channel`, well-formed or not.
    pub fn emit_raw(&self, channel: &str, payload: Value) -> usize {
        self.events
            .send((channel.to_string(), payload))
            .unwrap_or(0)
    }

    pub fn polygon(&self, id: &PolygonId) -> Option<LoopbackPolygon> {
        lock(&self.polygons).get(id).cloned()
    }

    pub fn polygon_ids(&self) -> Vec<PolygonId> {
        lock(&self.polygons).keys().cloned().collect()
    }

    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        lock(&self.invocations).clone()
    }

    fn apply(&self, command: PolygonCommand) -> Result<(), HostError> {
        let mut polygons = lock(&self.polygons);
        match command {
            PolygonCommand::Register { id } => {
                if polygons.contains_key(&id) {
                    return Err(HostError::PolygonExists(id));
                }
                polygons.insert(id, LoopbackPolygon::default());
            }
            PolygonCommand::RegisterAll { ids } => {
                for id in ids {
                    polygons.insert(id, LoopbackPolygon::default());
                }
            }
            PolygonCommand::Remove { id } => {
                polygons
                    .remove(&id)
                    .ok_or(HostError::PolygonNotFound(id))?;
            }
            PolygonCommand::Clear => polygons.clear(),
            PolygonCommand::Show { id } => existing(&mut polygons, id)?.visible = true,
            PolygonCommand::Hide { id } => existing(&mut polygons, id)?.visible = false,
            PolygonCommand::Update { id, points } => {
                existing(&mut polygons, id)?.points = points.into_inner();
            }
        }
        Ok(())
    }

    fn report_failure(&self, command: &str, err: HostError) -> TransportError {
        error!(%command, error = %err, "loopback host rejected command");
        self.emit(&HostEvent::Error(ErrorPayload {
            error: err.to_string(),
        }));
        let payload = serde_json::to_value(CommandResponse::from(err)).unwrap_or(Value::Null);
        TransportError::Rejected {
            command: command.to_string(),
            payload,
        }
    }
}

fn existing(
    polygons: &mut BTreeMap<PolygonId, LoopbackPolygon>,
    id: PolygonId,
) -> Result<&mut LoopbackPolygon, HostError> {
    polygons.get_mut(&id).ok_or(HostError::PolygonNotFound(id))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl InvokeTransport for LoopbackHost {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, TransportError> {
        lock(&self.invocations).push(RecordedInvocation {
            command: command.to_string(),
            args: args.clone(),
        });

        let prefix = self.settings.command_prefix();
        let Some(name) = command.strip_prefix(prefix.as_str()) else {
            let err = HostError::UnknownCommand(command.to_string());
            return Err(self.report_failure(command, err));
        };
        let outcome = PolygonCommand::decode(name, args).and_then(|decoded| self.apply(decoded));
        match outcome {
            Ok(()) => {
                debug!(%command, "loopback host applied command");
                serde_json::to_value(CommandResponse::success())
                    .map_err(|err| TransportError::Unavailable(err.to_string()))
            }
            Err(err) => Err(self.report_failure(command, err)),
        }
    }
}

impl EventSource for LoopbackHost {
    fn listen(&self, channel: &str) -> BoxStream<'static, Value> {
        let channel = channel.to_string();
        BroadcastStream::new(self.events.subscribe())
            .filter_map(move |item| {
                future::ready(match item {
                    Ok((emitted_on, payload)) if emitted_on == channel => Some(payload),
                    Ok(_) => None,
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!(%channel, skipped, "listener lagged; host events dropped");
                        None
                    }
                })
            })
            .boxed()
    }
}
