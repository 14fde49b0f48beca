//! Errors raised while building or reading frames.
//!
//! When you see a `ProtocolError`, the problem is in turning events into
//! bytes or back, not in networking or session state.

/// A frame that could not be produced or understood.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into an event).
    ///
    /// Common causes: malformed JSON, an unknown event name, a missing
    /// required field or a value of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The event is well-formed but breaks a protocol rule, e.g. a raise
    /// without an amount.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
