//! # cardsync
//!
//! Real-time synchronization client for server-authoritative card tables.
//!
//! The server owns the game. This crate keeps a local mirror of it in sync:
//! it holds one persistent connection, folds every server push into a
//! [`SessionStore`], turns user intents into protocol messages, and reports
//! changes as [`ClientEvent`]s for a front end to render.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardsync::prelude::*;
//!
//! # async fn demo() -> Result<(), CardsyncError> {
//! let config = ClientConfig::default().with_url("ws://127.0.0.1:5000/ws");
//! let connector = WebSocketConnector::new(config.url.clone());
//! let (client, mut events) = Client::start(config, connector);
//!
//! client.set_name("Alice").await?;
//! client.request_game_list().await?;
//! while let Some(event) = events.recv().await {
//!     if let ClientEvent::StateChanged(store) = event {
//!         println!("{}", project(&store));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! ClientHandle ──→ Client task ──→ dispatcher ──→ ConnectionManager ──→ server
//!                      ↑                                  │
//!   ClientEvent ←── router ←──────────────────────────────┘
//! ```

mod client;
mod config;
mod connection;
pub mod dispatcher;
mod error;
pub mod router;
pub mod view;

pub use client::{Client, ClientEvent, ClientHandle};
pub use config::{ClientConfig, DEFAULT_URL};
pub use connection::{ConnectOutcome, ConnectionManager, Inbound};
pub use dispatcher::Command;
pub use error::{CardsyncError, CommandError};
pub use router::{Notice, RestartDirective};
pub use view::{View, project};

pub use cardsync_protocol::{
    ActionKind, Card, ClientMessage, GameId, GameResult, GameSnapshot, PlayerView, PrivateHand,
    ServerMessage,
};
pub use cardsync_session::{ConnectionStatus, Membership, SessionStore};
pub use cardsync_transport::{Connection, Connector, WebSocketConnector};

/// Everything a front end usually needs.
pub mod prelude {
    pub use crate::view::{TableView, View, project};
    pub use crate::{
        CardsyncError, Client, ClientConfig, ClientEvent, ClientHandle, Command, CommandError,
        ConnectionStatus, GameId, Notice, SessionStore, WebSocketConnector,
    };
}
