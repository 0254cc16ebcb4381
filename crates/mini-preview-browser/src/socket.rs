//! `WebSocket` transport for the render channel.

use mini_preview_core::{Transport, TransportError, Url};
use wasm_bindgen::JsValue;
use web_sys::WebSocket;

/// A JS exception, flattened to its debug text so it can cross into
/// `Send + Sync` error types.
#[derive(Debug, Clone, thiserror::Error)]
#[error("javascript error: {0}")]
pub struct JsFailure(pub String);

impl From<JsValue> for JsFailure {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Self(message),
            None => Self(format!("{value:?}")),
        }
    }
}

#[derive(Clone)]
pub struct WebSocketTransport {
    socket: WebSocket,
}

impl WebSocketTransport {
    /// Start connecting to the renderer endpoint.
    pub fn open(endpoint: &Url) -> Result<Self, JsFailure> {
        tracing::info!(%endpoint, "opening render socket");
        let socket = WebSocket::new(endpoint.as_str())?;
        Ok(Self { socket })
    }

    pub fn socket(&self) -> &WebSocket {
        &self.socket
    }
}

impl Transport for WebSocketTransport {
    fn send_text(&self, text: &str) -> Result<(), TransportError> {
        self.socket
            .send_with_str(text)
            .map_err(|e| Box::new(JsFailure::from(e)) as TransportError)
    }
}
