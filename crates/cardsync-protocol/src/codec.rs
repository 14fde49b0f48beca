//! Codec trait and implementations for serializing/deserializing events.
//!
//! The rest of the client doesn't care HOW events become bytes; it only
//! needs something that implements [`Codec`]. [`JsonCodec`] matches the
//! JSON text frames the game server speaks.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Turns events into frame payloads and back.
///
/// `Send + Sync + 'static` because the codec lives inside the client
/// actor task, which Tokio may move between worker threads.
pub trait Codec: Send + Sync + 'static {
    /// Builds the payload for one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Reads one frame payload.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` when the payload isn't a known event
    /// with a well-formed body.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// The JSON text encoding the game server speaks.
///
/// ## Example
///
/// ```rust
/// use cardsync_protocol::{ClientMessage, Codec, GameId, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg = ClientMessage::Reveal { game_id: GameId::new("game-1") };
///
/// let bytes = codec.encode(&msg).unwrap();
/// assert_eq!(bytes, br#"{"event":"reveal","data":{"game_id":"game-1"}}"#);
///
/// let decoded: ClientMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
