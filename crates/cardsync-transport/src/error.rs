/// Failures of the link to the game server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The link is gone; the string says why.
    #[error("link closed: {0}")]
    ConnectionClosed(String),

    /// The server could not be reached, or refused the handshake.
    #[error("could not reach server: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// A frame could not be written.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The link broke while waiting for a frame.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
