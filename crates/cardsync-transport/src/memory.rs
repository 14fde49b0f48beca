//! In-process transport backed by Tokio channels.
//!
//! [`MemoryConnector::offer`] queues one client-side connection and hands
//! back the server-side [`MemoryPeer`]. Each `connect()` consumes the oldest
//! queued connection; with nothing queued it fails like an unreachable
//! server, which lets tests drive reconnect loops deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::{Connection, ConnectionId, Connector, TransportError};

/// A [`Connector`] that hands out pre-arranged in-memory connections.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    pending: Arc<std::sync::Mutex<VecDeque<MemoryConnection>>>,
}

impl MemoryConnector {
    /// Creates a connector with no queued connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a connection for the next `connect()` and returns the
    /// server side of it.
    pub fn offer(&self) -> MemoryPeer {
        let (conn, peer) = pair();
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(conn);
        peer
    }

    /// Number of queued connections not yet taken by `connect()`.
    pub fn pending(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;

    async fn connect(&self) -> Result<Self::Connection, TransportError> {
        let next = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        next.ok_or_else(|| {
            TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "no memory connection offered",
            ))
        })
    }
}

/// Creates a connected client/server pair.
pub fn pair() -> (MemoryConnection, MemoryPeer) {
    let (to_client, client_rx) = mpsc::unbounded_channel();
    let (client_tx, from_client) = mpsc::unbounded_channel();
    let conn = MemoryConnection {
        id: ConnectionId::next(),
        inbound: Mutex::new(client_rx),
        outbound: client_tx,
        closed: AtomicBool::new(false),
    };
    let peer = MemoryPeer {
        to_client,
        from_client,
    };
    (conn, peer)
}

/// Client side of an in-memory connection.
pub struct MemoryConnection {
    id: ConnectionId,
    inbound: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    closed: AtomicBool,
}

impl Connection for MemoryConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::ConnectionClosed(
                "closed locally".into(),
            ));
        }
        self.outbound.send(data.to_vec()).map_err(|_| {
            TransportError::ConnectionClosed("peer dropped".into())
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Ok(None);
        }
        Ok(self.inbound.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Server side of an in-memory connection.
///
/// Dropping the peer closes the connection from the client's point of view.
pub struct MemoryPeer {
    to_client: mpsc::UnboundedSender<Vec<u8>>,
    from_client: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl MemoryPeer {
    /// Pushes one frame to the client. Returns `false` once the client
    /// connection is gone.
    pub fn send(&self, data: impl Into<Vec<u8>>) -> bool {
        self.to_client.send(data.into()).is_ok()
    }

    /// Waits for the next frame the client sent.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.from_client.recv().await
    }

    /// Returns a frame the client already sent, without waiting.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.from_client.try_recv().ok()
    }
}
