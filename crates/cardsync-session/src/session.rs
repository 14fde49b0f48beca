//! Session types: who the local player is and which game they belong to.
//!
//! A "session" is this client's record of its own identity and its
//! connection / game membership. It does not hold any game data; that lives
//! next to it in the [`SessionStore`](crate::SessionStore).

use std::fmt;

use cardsync_protocol::GameId;

// ---------------------------------------------------------------------------
// ConnectionStatus
// ---------------------------------------------------------------------------

/// The coarse lifecycle state, without the game id.
///
/// ```text
///   Disconnected ──(connect)──→ LobbyOnly ──(join)──→ Joining ──(game_state)──→ InGame
///        ↑                        ↑  ↑                   │                        │
///        │                        │  └────(join_error)───┘                        │
///        │                        └──────────(leave / game_deleted)───────────────┘
///        └──────────────────────(connection lost, from any state)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Disconnected,
    LobbyOnly,
    Joining,
    InGame,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::LobbyOnly => write!(f, "LobbyOnly"),
            Self::Joining => write!(f, "Joining"),
            Self::InGame => write!(f, "InGame"),
        }
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// The lifecycle state together with the game it refers to.
///
/// The game id lives *inside* the `Joining` and `InGame` variants, so an
/// active game id without `InGame` (or the reverse) can't be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Membership {
    /// No live connection.
    #[default]
    Disconnected,

    /// Connected, browsing the lobby.
    LobbyOnly,

    /// `join_game` sent, waiting for the first `game_state`.
    Joining { game_id: GameId },

    /// Seated at a table.
    InGame { game_id: GameId },
}

impl Membership {
    /// The field-less status of this membership.
    pub fn status(&self) -> ConnectionStatus {
        match self {
            Self::Disconnected => ConnectionStatus::Disconnected,
            Self::LobbyOnly => ConnectionStatus::LobbyOnly,
            Self::Joining { .. } => ConnectionStatus::Joining,
            Self::InGame { .. } => ConnectionStatus::InGame,
        }
    }

    /// The game being joined or played, if any.
    pub fn game_id(&self) -> Option<&GameId> {
        match self {
            Self::Joining { game_id } | Self::InGame { game_id } => Some(game_id),
            Self::Disconnected | Self::LobbyOnly => None,
        }
    }

    /// Returns `true` while joining or seated.
    pub fn is_joined(&self) -> bool {
        self.game_id().is_some()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The local player's identity and membership.
///
/// Created at startup as `Disconnected` with no name. Only the store's
/// transitions change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) local_player_name: Option<String>,
    pub(crate) membership: Membership,
}

impl Session {
    /// The name this client plays under, once set.
    pub fn local_player_name(&self) -> Option<&str> {
        self.local_player_name.as_deref()
    }

    /// Current membership, including the game id.
    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Current coarse status.
    pub fn status(&self) -> ConnectionStatus {
        self.membership.status()
    }

    /// The active game. `Some` exactly when the status is `InGame`.
    pub fn active_game_id(&self) -> Option<&GameId> {
        match &self.membership {
            Membership::InGame { game_id } => Some(game_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_disconnected_and_anonymous() {
        let session = Session::default();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
        assert_eq!(session.local_player_name(), None);
        assert_eq!(session.active_game_id(), None);
    }

    #[test]
    fn test_active_game_id_only_when_in_game() {
        let id = GameId::new("g1");
        let joining = Session {
            local_player_name: Some("Alice".into()),
            membership: Membership::Joining {
                game_id: id.clone(),
            },
        };
        assert_eq!(joining.active_game_id(), None);
        assert_eq!(joining.membership().game_id(), Some(&id));

        let playing = Session {
            membership: Membership::InGame {
                game_id: id.clone(),
            },
            ..joining
        };
        assert_eq!(playing.active_game_id(), Some(&id));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ConnectionStatus::LobbyOnly.to_string(), "LobbyOnly");
        assert_eq!(ConnectionStatus::InGame.to_string(), "InGame");
    }
}
