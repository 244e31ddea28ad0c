//! The boundary between the bindings and whatever hosts the polygon state.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("host unavailable: {0}")]
    Unavailable(String),
    /// The host rejected the call and attached a payload, usually the failure response.
    #[error("host rejected `{command}`: {payload}")]
    Rejected { command: String, payload: Value },
}

/// Sends a named invocation to the host and resolves with its raw reply.
#[async_trait]
pub trait InvokeTransport: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, TransportError>;
}

/// Host event channels. The subscription is live once `listen` returns.
pub trait EventSource: Send + Sync {
    fn listen(&self, channel: &str) -> BoxStream<'static, Value>;
}

pub struct MissingTransport;

#[async_trait]
impl InvokeTransport for MissingTransport {
    async fn invoke(&self, command: &str, _args: Value) -> Result<Value, TransportError> {
        Err(TransportError::Unavailable(format!(
            "no polygon host attached to serve `{command}`"
        )))
    }
}

impl EventSource for MissingTransport {
    fn listen(&self, _channel: &str) -> BoxStream<'static, Value> {
        stream::empty().boxed()
    }
}
