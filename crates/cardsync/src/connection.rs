//! Connection manager: the one live link to the game server.
//!
//! Owns the transport handle and the codec, and knows when to try again
//! after the link drops. It never queues: sending while disconnected fails
//! with [`CardsyncError::NotConnected`].

use std::time::Duration;

use cardsync_protocol::{ClientMessage, Codec, ProtocolError, ServerMessage};
use cardsync_transport::{Connection, ConnectionId, Connector, TransportError};
use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, info, trace, warn};

use crate::config::ClientConfig;
use crate::error::CardsyncError;

/// What [`ConnectionManager::recv`] produced.
#[derive(Debug)]
pub enum Inbound {
    /// A well-formed server event.
    Message(ServerMessage),

    /// A frame that didn't decode. The connection is still fine.
    Malformed(ProtocolError),

    /// The link is gone. `None` for an orderly close.
    Closed(Option<TransportError>),
}

/// Result of one connection attempt.
#[derive(Debug)]
pub enum ConnectOutcome {
    Connected(ConnectionId),
    /// Failed; another attempt is due after this long.
    RetryIn(Duration),
    /// Failed too often, no more attempts.
    GaveUp(TransportError),
}

pub struct ConnectionManager<K: Connector, C: Codec> {
    connector: K,
    codec: C,
    connection: Option<K::Connection>,
    reconnect_delay: Duration,
    reconnect_jitter: Duration,
    max_attempts: Option<u32>,
    /// Consecutive failed attempts since the last successful connect.
    failures: u32,
    retry_at: Option<Instant>,
}

impl<K: Connector, C: Codec> ConnectionManager<K, C> {
    pub fn new(connector: K, codec: C, config: &ClientConfig) -> Self {
        Self {
            connector,
            codec,
            connection: None,
            reconnect_delay: config.reconnect_delay,
            reconnect_jitter: config.reconnect_jitter,
            max_attempts: config.max_reconnect_attempts,
            failures: 0,
            retry_at: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Id of the live connection.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(Connection::id)
    }

    /// When the next reconnect attempt is due.
    pub fn retry_at(&self) -> Option<Instant> {
        self.retry_at
    }

    /// Makes one connection attempt.
    pub async fn connect(&mut self) -> ConnectOutcome {
        self.retry_at = None;
        match self.connector.connect().await {
            Ok(connection) => {
                let id = connection.id();
                info!(conn = %id, "connected");
                self.connection = Some(connection);
                self.failures = 0;
                ConnectOutcome::Connected(id)
            }
            Err(e) => {
                self.failures += 1;
                warn!(error = %e, attempt = self.failures, "connect failed");
                match self.schedule_retry() {
                    Some(delay) => ConnectOutcome::RetryIn(delay),
                    None => ConnectOutcome::GaveUp(e),
                }
            }
        }
    }

    /// Encodes and sends one message.
    ///
    /// # Errors
    /// - [`CardsyncError::NotConnected`] — no live connection
    /// - [`CardsyncError::Protocol`] — the message breaks a protocol rule
    /// - [`CardsyncError::Transport`] — the write failed
    pub async fn send(&self, message: &ClientMessage) -> Result<(), CardsyncError> {
        let Some(connection) = &self.connection else {
            return Err(CardsyncError::NotConnected);
        };
        message.validate()?;
        let bytes = self.codec.encode(message)?;
        connection.send(&bytes).await?;
        trace!(conn = %connection.id(), event = message.event_name(), "sent");
        Ok(())
    }

    /// Waits for the next inbound frame. Pends forever while disconnected.
    pub async fn recv(&self) -> Inbound {
        let Some(connection) = &self.connection else {
            return std::future::pending().await;
        };
        match connection.recv().await {
            Ok(Some(bytes)) => match self.codec.decode::<ServerMessage>(&bytes) {
                Ok(message) => {
                    trace!(conn = %connection.id(), event = message.event_name(), "received");
                    Inbound::Message(message)
                }
                Err(e) => Inbound::Malformed(e),
            },
            Ok(None) => Inbound::Closed(None),
            Err(e) => Inbound::Closed(Some(e)),
        }
    }

    /// Drops the dead link and schedules the first reconnect attempt.
    ///
    /// Returns the wait before that attempt, or `None` when reconnecting is
    /// disabled.
    pub fn connection_lost(&mut self) -> Option<Duration> {
        if let Some(connection) = self.connection.take() {
            debug!(conn = %connection.id(), "connection dropped");
        }
        self.failures = 0;
        self.schedule_retry()
    }

    /// Resolves when a reconnect attempt is due. Pends forever when none is
    /// scheduled.
    pub async fn wait_reconnect(&self) {
        match self.retry_at {
            Some(deadline) => time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Closes the live connection, if any.
    pub async fn close(&mut self) {
        self.retry_at = None;
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close().await {
                debug!(error = %e, "close failed");
            }
        }
    }

    fn schedule_retry(&mut self) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| self.failures >= max) {
            self.retry_at = None;
            return None;
        }
        let delay = self.reconnect_delay + self.jitter();
        self.retry_at = Some(Instant::now() + delay);
        Some(delay)
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.reconnect_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max_ms))
    }
}
