use thiserror::Error;

use crate::domain::PolygonId;

/// Local usage errors raised before anything crosses the boundary.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Event [{name}] does not exist. Available event: {available}")]
    UnknownEvent { name: String, available: String },
    #[error("At least 3 points needed but got {0}.")]
    PointsNotEnough(usize),
    #[error("Point at index {0} has a non-finite coordinate.")]
    NonFinitePoint(usize),
    #[error("malformed payload for event {event}: {source}")]
    MalformedPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reported by the host side of the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Polygon with id [{0}] not found.")]
    PolygonNotFound(PolygonId),
    #[error("Polygon with id [{0}] already exists.")]
    PolygonExists(PolygonId),
    #[error("At least 3 points needed but got {0}.")]
    PointsNotEnough(usize),
    #[error("Unknown command [{0}].")]
    UnknownCommand(String),
    #[error("Invalid arguments for command [{command}]: {message}")]
    InvalidArguments { command: String, message: String },
}
