//! Local session state for cardsync.
//!
//! This crate holds what the client currently believes about itself and
//! its table:
//!
//! 1. **Identity and membership** — [`Session`], [`Membership`],
//!    [`ConnectionStatus`]
//! 2. **The store** — [`SessionStore`], the single source of truth that
//!    only changes through explicit, all-or-nothing transitions
//!
//! # How it fits in the stack
//!
//! ```text
//! Router / Dispatcher (above)  ← drive transitions from events and commands
//!     ↕
//! Session Layer (this crate)   ← lobby, membership, snapshot, private hand
//!     ↕
//! Protocol Layer (below)       ← GameId, GameSnapshot, PrivateHand types
//! ```

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{ConnectionStatus, Membership, Session};
pub use store::SessionStore;
