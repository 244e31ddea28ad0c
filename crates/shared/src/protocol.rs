use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    domain::{Point, PolygonId, Position, Vertices},
    error::{HostError, ProtocolError},
};

/// Result of every polygon command. `error` is only populated when `ok` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

impl From<HostError> for CommandResponse {
    fn from(value: HostError) -> Self {
        Self::failure(value.to_string())
    }
}

/// One outbound invocation to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonCommand {
    Register { id: PolygonId },
    RegisterAll { ids: Vec<PolygonId> },
    Remove { id: PolygonId },
    Clear,
    Show { id: PolygonId },
    Hide { id: PolygonId },
    Update { id: PolygonId, points: Vertices },
}

#[derive(Deserialize)]
struct IdArgs {
    id: PolygonId,
}

#[derive(Deserialize)]
struct IdListArgs {
    id: Vec<PolygonId>,
}

#[derive(Deserialize)]
struct UpdateArgs {
    id: PolygonId,
    points: Vec<Point>,
}

impl PolygonCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PolygonCommand::Register { .. } => "register",
            PolygonCommand::RegisterAll { .. } => "register_all",
            PolygonCommand::Remove { .. } => "remove",
            PolygonCommand::Clear => "clear",
            PolygonCommand::Show { .. } => "show",
            PolygonCommand::Hide { .. } => "hide",
            PolygonCommand::Update { .. } => "update",
        }
    }

    /// Argument object sent alongside the invocation name.
    pub fn args(&self) -> Value {
        match self {
            PolygonCommand::Register { id }
            | PolygonCommand::Remove { id }
            | PolygonCommand::Show { id }
            | PolygonCommand::Hide { id } => json!({ "id": id }),
            PolygonCommand::RegisterAll { ids } => json!({ "id": ids }),
            PolygonCommand::Clear => json!({}),
            PolygonCommand::Update { id, points } => json!({ "id": id, "points": points }),
        }
    }

    /// Host-side decoding of an invocation name plus its argument object.
    pub fn decode(name: &str, args: Value) -> Result<Self, HostError> {
        let invalid = |err: serde_json::Error| HostError::InvalidArguments {
            command: name.to_string(),
            message: err.to_string(),
        };
        match name {
            "register" => {
                let IdArgs { id } = serde_json::from_value(args).map_err(invalid)?;
                Ok(PolygonCommand::Register { id })
            }
            "register_all" => {
                let IdListArgs { id } = serde_json::from_value(args).map_err(invalid)?;
                Ok(PolygonCommand::RegisterAll { ids: id })
            }
            "remove" => {
                let IdArgs { id } = serde_json::from_value(args).map_err(invalid)?;
                Ok(PolygonCommand::Remove { id })
            }
            "clear" => Ok(PolygonCommand::Clear),
            "show" => {
                let IdArgs { id } = serde_json::from_value(args).map_err(invalid)?;
                Ok(PolygonCommand::Show { id })
            }
            "hide" => {
                let IdArgs { id } = serde_json::from_value(args).map_err(invalid)?;
                Ok(PolygonCommand::Hide { id })
            }
            "update" => {
                let UpdateArgs { id, points } = serde_json::from_value(args).map_err(invalid)?;
                let points = Vertices::try_from(points).map_err(|err| match err {
                    ProtocolError::PointsNotEnough(count) => HostError::PointsNotEnough(count),
                    other => HostError::InvalidArguments {
                        command: name.to_string(),
                        message: other.to_string(),
                    },
                })?;
                Ok(PolygonCommand::Update { id, points })
            }
            other => Err(HostError::UnknownCommand(other.to_string())),
        }
    }
}

/// The closed set of host events a subscriber can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventName {
    LeftClick,
    DoubleClick,
    RightClick,
    Drag,
    MouseMove,
    Wheel,
    Error,
}

impl EventName {
    pub const ALL: [EventName; 7] = [
        EventName::LeftClick,
        EventName::DoubleClick,
        EventName::RightClick,
        EventName::Drag,
        EventName::MouseMove,
        EventName::Wheel,
        EventName::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventName::LeftClick => "LeftClick",
            EventName::DoubleClick => "DoubleClick",
            EventName::RightClick => "RightClick",
            EventName::Drag => "Drag",
            EventName::MouseMove => "MouseMove",
            EventName::Wheel => "Wheel",
            EventName::Error => "Error",
        }
    }

    /// Suffix of the host channel this event arrives on, e.g. `LEFT_CLICK`.
    pub fn channel_suffix(self) -> &'static str {
        match self {
            EventName::LeftClick => "LEFT_CLICK",
            EventName::DoubleClick => "DOUBLE_CLICK",
            EventName::RightClick => "RIGHT_CLICK",
            EventName::Drag => "DRAG",
            EventName::MouseMove => "MOUSE_MOVE",
            EventName::Wheel => "WHEEL",
            EventName::Error => "ERROR",
        }
    }

    fn available() -> String {
        EventName::ALL
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownEvent {
                name: s.to_string(),
                available: EventName::available(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionPayload {
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelPayload {
    pub delta: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// A host-originated event, tagged by the name it was emitted under.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    LeftClick(PositionPayload),
    DoubleClick(PositionPayload),
    RightClick(PositionPayload),
    Drag(DragPayload),
    MouseMove(PositionPayload),
    Wheel(WheelPayload),
    Error(ErrorPayload),
}

impl HostEvent {
    pub fn name(&self) -> EventName {
        match self {
            HostEvent::LeftClick(_) => EventName::LeftClick,
            HostEvent::DoubleClick(_) => EventName::DoubleClick,
            HostEvent::RightClick(_) => EventName::RightClick,
            HostEvent::Drag(_) => EventName::Drag,
            HostEvent::MouseMove(_) => EventName::MouseMove,
            HostEvent::Wheel(_) => EventName::Wheel,
            HostEvent::Error(_) => EventName::Error,
        }
    }

    /// Interprets a raw channel payload as the event `name` carries.
    pub fn decode(name: EventName, raw: Value) -> Result<Self, ProtocolError> {
        let event = match name {
            EventName::LeftClick => HostEvent::LeftClick(parse_payload(name, raw)?),
            EventName::DoubleClick => HostEvent::DoubleClick(parse_payload(name, raw)?),
            EventName::RightClick => HostEvent::RightClick(parse_payload(name, raw)?),
            EventName::Drag => HostEvent::Drag(parse_payload(name, raw)?),
            EventName::MouseMove => HostEvent::MouseMove(parse_payload(name, raw)?),
            EventName::Wheel => HostEvent::Wheel(parse_payload(name, raw)?),
            EventName::Error => HostEvent::Error(parse_payload(name, raw)?),
        };
        Ok(event)
    }

    /// Raw channel payload, the inverse of [`HostEvent::decode`].
    pub fn payload_value(&self) -> Value {
        let encoded = match self {
            HostEvent::LeftClick(payload)
            | HostEvent::DoubleClick(payload)
            | HostEvent::RightClick(payload)
            | HostEvent::MouseMove(payload) => serde_json::to_value(payload),
            HostEvent::Drag(payload) => serde_json::to_value(payload),
            HostEvent::Wheel(payload) => serde_json::to_value(payload),
            HostEvent::Error(payload) => serde_json::to_value(payload),
        };
        // Payload structs hold only numbers and strings.
        encoded.unwrap_or(Value::Null)
    }
}

fn parse_payload<T: DeserializeOwned>(name: EventName, raw: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(raw).map_err(|source| ProtocolError::MalformedPayload {
        event: name.as_str(),
        source,
    })
}
