//! The event catalog: every named message the client sends or receives.
//!
//! Each message travels as one frame:
//!
//! ```text
//! { "event": "join_game", "data": { "game_id": "game-1", "name": "Alice" } }
//! ```
//!
//! `#[serde(tag = "event", content = "data")]` produces exactly this
//! "adjacently tagged" shape, so the event name is the enum variant and the
//! payload schema is the variant's fields. Commands without arguments are
//! empty struct variants so they still carry `"data": {}`.

use serde::{Deserialize, Serialize};

use crate::{ActionKind, GameId, GameResult, GameSnapshot, PrivateHand, ProtocolError};

// ---------------------------------------------------------------------------
// Outbound (client → server)
// ---------------------------------------------------------------------------

/// Commands the client emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the lobby list.
    GetGames {},

    /// Open a new table.
    CreateGame {},

    /// Sit down at a table.
    JoinGame { game_id: GameId, name: String },

    /// Stand up from a table.
    LeaveGame { game_id: GameId, name: String },

    /// A betting action. `amount` is present iff `action` is `raise`;
    /// build these through [`ClientMessage::raise`], [`ClientMessage::call`]
    /// and [`ClientMessage::fold`] to keep that true.
    PlayerAction {
        game_id: GameId,
        name: String,
        action: ActionKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<u64>,
    },

    /// Ask the server to push the current `game_state`.
    GetGameState {},

    /// Ask the server to deal a new round.
    StartNewGame {},

    /// Show the local hand to the table.
    Reveal { game_id: GameId },
}

impl ClientMessage {
    /// A `raise` by `amount` chips.
    pub fn raise(game_id: GameId, name: impl Into<String>, amount: u64) -> Self {
        Self::PlayerAction {
            game_id,
            name: name.into(),
            action: ActionKind::Raise,
            amount: Some(amount),
        }
    }

    /// A `call`.
    pub fn call(game_id: GameId, name: impl Into<String>) -> Self {
        Self::PlayerAction {
            game_id,
            name: name.into(),
            action: ActionKind::Call,
            amount: None,
        }
    }

    /// A `fold`.
    pub fn fold(game_id: GameId, name: impl Into<String>) -> Self {
        Self::PlayerAction {
            game_id,
            name: name.into(),
            action: ActionKind::Fold,
            amount: None,
        }
    }

    /// The wire name of this event.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::GetGames {} => "get_games",
            Self::CreateGame {} => "create_game",
            Self::JoinGame { .. } => "join_game",
            Self::LeaveGame { .. } => "leave_game",
            Self::PlayerAction { .. } => "player_action",
            Self::GetGameState {} => "get_game_state",
            Self::StartNewGame {} => "start_new_game",
            Self::Reveal { .. } => "reveal",
        }
    }

    /// Checks the rules serde can't express.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for an empty game id or
    /// player name, a raise without a positive amount, or an amount on a
    /// call/fold.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let (game_id, name) = match self {
            Self::JoinGame { game_id, name } | Self::LeaveGame { game_id, name } => {
                (Some(game_id), Some(name))
            }
            Self::PlayerAction {
                game_id,
                name,
                action,
                amount,
            } => {
                match (action, amount) {
                    (ActionKind::Raise, Some(0) | None) => {
                        return Err(ProtocolError::InvalidMessage(
                            "raise requires a positive amount".into(),
                        ));
                    }
                    (ActionKind::Call | ActionKind::Fold, Some(_)) => {
                        return Err(ProtocolError::InvalidMessage(format!(
                            "{action} must not carry an amount"
                        )));
                    }
                    _ => {}
                }
                (Some(game_id), Some(name))
            }
            Self::Reveal { game_id } => (Some(game_id), None),
            Self::GetGames {}
            | Self::CreateGame {}
            | Self::GetGameState {}
            | Self::StartNewGame {} => (None, None),
        };

        if game_id.is_some_and(|id| id.as_str().is_empty()) {
            return Err(ProtocolError::InvalidMessage(format!(
                "{} requires a game id",
                self.event_name()
            )));
        }
        if name.is_some_and(|n| n.trim().is_empty()) {
            return Err(ProtocolError::InvalidMessage(format!(
                "{} requires a player name",
                self.event_name()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Inbound (server → client)
// ---------------------------------------------------------------------------

/// Events the server pushes.
///
/// An unknown event name or a payload that doesn't match its schema fails
/// to decode as a whole; nothing is partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The complete list of joinable tables.
    UpdateGames(Vec<GameId>),

    /// The public table state.
    GameState(GameSnapshot),

    /// The local player's private cards.
    PlayerHand(PrivateHand),

    /// A round finished.
    GameResult(GameResult),

    /// A table was closed because everybody left.
    GameDeleted { game_id: GameId },

    /// The server refused a `join_game`.
    JoinError { message: String },
}

impl ServerMessage {
    /// The wire name of this event.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::UpdateGames(_) => "update_games",
            Self::GameState(_) => "game_state",
            Self::PlayerHand(_) => "player_hand",
            Self::GameResult(_) => "game_result",
            Self::GameDeleted { .. } => "game_deleted",
            Self::JoinError { .. } => "join_error",
        }
    }
}
