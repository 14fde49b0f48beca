//! Wire protocol for cardsync.
//!
//! This crate defines the vocabulary the client and the game server speak:
//!
//! - **Payload types** ([`GameSnapshot`], [`Card`], [`PlayerView`], ...) —
//!   the data carried by events.
//! - **Event catalog** ([`ClientMessage`], [`ServerMessage`]) — every
//!   named event and its payload schema.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer sits between transport (raw frames) and session
//! (what the client believes). It knows nothing about connections or
//! game membership.
//!
//! ```text
//! Transport (bytes) → Protocol (ServerMessage) → Session (store)
//! ```

mod codec;
mod error;
mod messages;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{ClientMessage, ServerMessage};
pub use types::{
    ActionKind, Card, GameId, GameResult, GameSnapshot, PlayerView, PrivateHand,
};
