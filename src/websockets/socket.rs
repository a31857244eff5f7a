use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, warn};
use uuid::Uuid;

/// Liveness settings for a connection
///
/// A ping is written every `ping_interval`; a connection that has not
/// answered with a pong within `idle_timeout` is treated identically to an
/// explicit disconnect.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    pub ping_interval: Duration,
    pub idle_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(25),
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Inbound traffic as seen by the connection loop
#[derive(Debug)]
pub enum Inbound {
    /// A text frame from the client
    Text(String),
    /// Heartbeat answer
    Pong,
    /// A frame the relay does not care about (binary, client pings)
    Ignored,
}

/// Simple WebSocket abstraction - all we care about is send/receive/ping
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next frame from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<Inbound>, SocketError>;

    /// Send a heartbeat ping
    async fn send_ping(&mut self) -> Result<(), SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming message from the client
    async fn handle_message(&self, connection_id: Uuid, message: String);
}

#[derive(Debug)]
pub enum SocketError {
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<Inbound>, SocketError> {
        match self.next().await {
            Some(Ok(Message::Text(text))) => Ok(Some(Inbound::Text(text))),
            Some(Ok(Message::Pong(_))) => Ok(Some(Inbound::Pong)),
            Some(Ok(Message::Close(_))) => Ok(None),
            Some(Ok(_)) => Ok(Some(Inbound::Ignored)),
            Some(Err(e)) => Err(SocketError::ReceiveFailed(e.to_string())),
            None => Ok(None), // Connection closed
        }
    }

    async fn send_ping(&mut self) -> Result<(), SocketError> {
        self.send(Message::Ping(Vec::new()))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Connection represents one managed WebSocket session
///
/// The outbound receiver carries fan-out from the relay; inbound frames go to
/// the message handler. The loop also owns the heartbeat: pings on a timer,
/// pongs refresh the liveness deadline.
pub struct Connection {
    pub id: Uuid,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    message_handler: Arc<dyn MessageHandler>,
    heartbeat: HeartbeatConfig,
}

impl Connection {
    pub fn new(
        id: Uuid,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        message_handler: Arc<dyn MessageHandler>,
        heartbeat: HeartbeatConfig,
    ) -> Self {
        Self {
            id,
            socket,
            outbound_receiver,
            message_handler,
            heartbeat,
        }
    }

    /// Run the connection - handles sending, receiving and the heartbeat
    /// until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        let mut ping_timer = interval(self.heartbeat.ping_interval);
        ping_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_pong = Instant::now();

        loop {
            tokio::select! {
                // Handle outbound messages (from the relay to the client)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => {
                            self.socket.send_message(message).await?
                        }
                        None => break, // Channel closed, disconnect
                    }
                }

                // Handle inbound frames (from the client to the relay)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(Inbound::Text(message))) => {
                            self.message_handler
                                .handle_message(self.id, message)
                                .await;
                        }
                        Ok(Some(Inbound::Pong)) => {
                            last_pong = Instant::now();
                        }
                        Ok(Some(Inbound::Ignored)) => {
                            debug!(connection_id = %self.id, "Ignoring non-text frame");
                        }
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }

                _ = ping_timer.tick() => {
                    if last_pong.elapsed() > self.heartbeat.idle_timeout {
                        warn!(
                            connection_id = %self.id,
                            idle_secs = last_pong.elapsed().as_secs(),
                            "Heartbeat idle timeout, dropping connection"
                        );
                        break;
                    }
                    self.socket.send_ping().await?;
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }
}
