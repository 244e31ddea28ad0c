use shared::error::ProtocolError;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum PolygonError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("register_all needs at least one polygon id")]
    EmptyBatch,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed response for `{command}`: {source}")]
    Response {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PolygonError>;
