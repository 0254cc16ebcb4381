//! tokio-tungstenite transport.
//!
//! The socket's write half is owned by a single writer task; the render
//! channel hands it messages through an unbounded queue, so sends never block
//! the caller.

use futures_util::SinkExt;
use mini_preview_core::{Transport, TransportError};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{trace, warn};

pub struct NativeTransport {
    tx: mpsc::UnboundedSender<Message>,
}

impl NativeTransport {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }
}

impl Transport for NativeTransport {
    fn send_text(&self, text: &str) -> Result<(), TransportError> {
        self.tx
            .send(Message::Text(text.to_string().into()))
            .map_err(|_| "writer task has stopped".into())
    }
}

/// Forward queued messages to the socket until the queue closes or a send fails.
pub async fn run_writer<S>(mut write: S, mut rx: mpsc::UnboundedReceiver<Message>)
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Some(message) = rx.recv().await {
        if let Err(e) = write.send(message).await {
            warn!(error = %e, "failed to send render request");
            return;
        }
        trace!("render request written");
    }
    // Queue closed: every transport handle is gone.
    if let Err(e) = write.close().await {
        trace!(error = %e, "socket close failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writer_forwards_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = NativeTransport::new(tx);
        transport.send_text("first").unwrap();
        transport.send_text("second").unwrap();
        drop(transport);

        let mut written: Vec<Message> = Vec::new();
        run_writer(&mut written, rx).await;
        assert_eq!(
            written,
            vec![
                Message::Text("first".to_string().into()),
                Message::Text("second".to_string().into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_after_writer_stopped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let transport = NativeTransport::new(tx);
        assert!(transport.send_text("lost").is_err());
    }
}
