//! Message ports between the page context and the background.
//!
//! The page side only ever talks through a [`MessagePort`]. The in-process
//! implementation pairs an mpsc queue with a oneshot reply per request; a
//! dropped listener plays the part of a reloaded extension.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};
use xreply_core::{ReplyError, TweetContent};

use crate::error::BridgeError;
use crate::protocol::{Request, Response};

/// Requests queued before senders wait.
pub const DEFAULT_PORT_CAPACITY: usize = 32;

// ============================================================================
// Port Trait
// ============================================================================

/// Sends one request and waits for its response.
#[async_trait]
pub trait MessagePort: Send + Sync {
    /// Delivers `request` to the background.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ContextInvalidated`] when the background is
    /// gone and [`BridgeError::NoResponse`] when it dropped the request.
    async fn send(&self, request: Request) -> Result<Response, BridgeError>;
}

// ============================================================================
// In-Process Port
// ============================================================================

/// A request waiting for the background to answer it.
#[derive(Debug)]
pub struct IncomingMessage {
    /// The request.
    pub request: Request,
    responder: oneshot::Sender<Response>,
}

impl IncomingMessage {
    /// Answers the request. A sender that stopped waiting is ignored.
    pub fn respond(self, response: Response) {
        if self.responder.send(response).is_err() {
            debug!("Sender stopped waiting for the response");
        }
    }
}

/// Page-side end of an in-process channel.
#[derive(Debug, Clone)]
pub struct InProcessPort {
    tx: mpsc::Sender<IncomingMessage>,
}

/// Background-side end of an in-process channel.
#[derive(Debug)]
pub struct PortListener {
    rx: mpsc::Receiver<IncomingMessage>,
}

impl PortListener {
    /// Waits for the next request. Returns `None` once every port is gone.
    pub async fn recv(&mut self) -> Option<IncomingMessage> {
        self.rx.recv().await
    }
}

/// Creates a connected port pair.
pub fn channel(capacity: usize) -> (InProcessPort, PortListener) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (InProcessPort { tx }, PortListener { rx })
}

#[async_trait]
impl MessagePort for InProcessPort {
    async fn send(&self, request: Request) -> Result<Response, BridgeError> {
        let (responder, response) = oneshot::channel();
        self.tx
            .send(IncomingMessage { request, responder })
            .await
            .map_err(|_| {
                BridgeError::from_runtime_message(
                    "Could not establish connection. Receiving end does not exist.",
                )
            })?;
        response.await.map_err(|_| BridgeError::NoResponse)
    }
}

// ============================================================================
// Runtime Bridge
// ============================================================================

/// Typed page-side client for the background.
#[derive(Clone)]
pub struct RuntimeBridge {
    port: Arc<dyn MessagePort>,
}

impl std::fmt::Debug for RuntimeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeBridge").finish_non_exhaustive()
    }
}

impl RuntimeBridge {
    /// Wraps a port.
    pub fn new(port: Arc<dyn MessagePort>) -> Self {
        Self { port }
    }

    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Transport failures become [`ReplyError`]s; a stale context becomes
    /// [`ReplyError::ContextInvalidated`].
    #[instrument(skip(self, request), fields(action = request.action()))]
    pub async fn send_request(&self, request: Request) -> Result<Response, ReplyError> {
        match self.port.send(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                warn!(error = %err, "Message delivery failed");
                Err(err.into())
            }
        }
    }

    /// Asks the background for a reply to `tweet`.
    ///
    /// # Errors
    ///
    /// Returns the background's error, or a transport error.
    pub async fn generate_reply(&self, tweet: &TweetContent) -> Result<String, ReplyError> {
        self.send_request(Request::GenerateReply {
            tweet_content: tweet.clone(),
        })
        .await?
        .into_text()
    }

    /// Asks the background for a tweet from a finished prompt.
    ///
    /// # Errors
    ///
    /// Returns the background's error, or a transport error.
    pub async fn generate_tweet(&self, prompt: impl Into<String>) -> Result<String, ReplyError> {
        self.send_request(Request::GenerateTweet {
            prompt: prompt.into(),
        })
        .await?
        .into_text()
    }

    /// Reports a usage event. Delivery is best-effort.
    pub async fn record_stats(&self, action: impl Into<String>, data: Value) {
        let request = Request::RecordStats {
            stats_action: action.into(),
            data,
        };
        if let Err(err) = self.send_request(request).await {
            debug!(error = %err, "Stats not recorded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_through_listener() {
        let (port, mut listener) = channel(4);
        tokio::spawn(async move {
            while let Some(message) = listener.recv().await {
                let response = match &message.request {
                    Request::GenerateTweet { prompt } => Response::tweet(prompt.to_uppercase()),
                    _ => Response::ack(),
                };
                message.respond(response);
            }
        });

        let bridge = RuntimeBridge::new(Arc::new(port));
        assert_eq!(bridge.generate_tweet("hey").await.unwrap(), "HEY");
    }

    #[tokio::test]
    async fn test_closed_listener_is_context_invalidated() {
        let (port, listener) = channel(4);
        drop(listener);

        let err = port.send(Request::OpenPopup).await.unwrap_err();
        assert!(err.is_context_invalidated());

        let bridge = RuntimeBridge::new(Arc::new(port));
        let err = bridge.generate_tweet("hey").await.unwrap_err();
        assert_eq!(err, ReplyError::ContextInvalidated);
    }

    #[tokio::test]
    async fn test_dropped_request_is_no_response() {
        let (port, mut listener) = channel(4);
        tokio::spawn(async move {
            // Take the request and never answer it.
            let _ = listener.recv().await;
        });

        let err = port.send(Request::OpenPopup).await.unwrap_err();
        assert!(matches!(err, BridgeError::NoResponse));
    }
}
