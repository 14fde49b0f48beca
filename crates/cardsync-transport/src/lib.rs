//! Client-side transport abstraction for cardsync.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract over
//! the persistent bidirectional channel to the game server. The client only
//! ever dials out: a `Connector` knows *where* the server is, and each call to
//! [`Connector::connect`] yields a fresh [`Connection`].
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`
//! - `memory` — in-process channel transport, used by tests

mod error;
#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Connections opened by this process so far.
static CONNECTIONS_OPENED: AtomicU64 = AtomicU64::new(0);

/// Sequence number of an established link.
///
/// Every successful dial gets a fresh one, so a reconnect shows up in the
/// logs as a different id from the link it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Takes the next number. The first link of a process is `link#1`.
    pub fn next() -> Self {
        Self(CONNECTIONS_OPENED.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ConnectionId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Dials the game server.
///
/// The returned futures are `Send` so the client actor can run on any
/// worker thread of the Tokio runtime.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Opens a new connection to the server.
    fn connect(
        &self,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single connection that can send and receive frames.
pub trait Connection: Send + Sync + 'static {
    /// Sends one frame to the server.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next frame from the server.
    ///
    /// `Ok(None)` means the server closed the link in an orderly way.
    /// Must be cancel-safe: the client drops this future whenever another
    /// `select!` branch wins.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Says goodbye to the server. Later `recv` calls yield `Ok(None)`.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let first = ConnectionId::next();
        let second = ConnectionId::next();
        assert!(second > first);
        assert!(first.get() >= 1);
    }

    #[test]
    fn test_id_renders_as_link_number() {
        assert_eq!(ConnectionId::from(3).to_string(), "link#3");
    }

    #[test]
    fn test_closed_error_keeps_reason() {
        let err = TransportError::ConnectionClosed("server went away".into());
        assert_eq!(err.to_string(), "link closed: server went away");
    }
}
