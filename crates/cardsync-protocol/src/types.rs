//! Payload types carried by cardsync events.
//!
//! Everything here travels "on the wire" as the `data` part of an event
//! frame. The server is authoritative for all of it: the client only ever
//! replaces these values wholesale, it never edits them in place.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a game table, as handed out by the server (e.g. `"game-1"`).
///
/// A newtype so a game id can't be confused with a player name even though
/// both are strings. `#[serde(transparent)]` keeps it a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    /// Creates a game id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Cards and players
// ---------------------------------------------------------------------------

/// A playing card. Rank and suit are opaque server strings (`"A"`, `"♠"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: String,
    pub suit: String,
}

impl Card {
    pub fn new(rank: impl Into<String>, suit: impl Into<String>) -> Self {
        Self {
            rank: rank.into(),
            suit: suit.into(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

/// The public view of one seated player.
///
/// `hand` is only ever present when the server embeds the requesting
/// player's own cards in a `game_state` broadcast. The session store strips
/// it before keeping the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub chips: u64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
}

// ---------------------------------------------------------------------------
// Game snapshot
// ---------------------------------------------------------------------------

/// The full public state of a table as of the last `game_state` event.
///
/// `pot` is required: a frame without it is rejected as a whole. The
/// sequences tolerate being absent or `null` and read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub pot: u64,

    /// Betting round name (`"pre-flop"`, `"river"`, ...). Opaque to the client.
    #[serde(default)]
    pub current_round: Option<String>,

    /// Name of the player whose turn it is.
    #[serde(default)]
    pub current_player: Option<String>,

    #[serde(default, deserialize_with = "nullable_default")]
    pub highest_bet: u64,

    #[serde(default, deserialize_with = "nullable_default")]
    pub community_cards: Vec<Card>,

    #[serde(default, deserialize_with = "nullable_default")]
    pub players: Vec<PlayerView>,
}

impl GameSnapshot {
    /// Looks up a seated player by name.
    pub fn player(&self, name: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.name == name)
    }
}

/// Cards dealt privately to the local player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateHand {
    pub hand: Vec<Card>,
}

/// Outcome of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// `null` when the round ended without a showdown winner, e.g. everyone
    /// folded.
    #[serde(default)]
    pub winner: Option<String>,
    pub pot: u64,
}

/// The betting action inside a `player_action` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Raise,
    Call,
    Fold,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raise => write!(f, "raise"),
            Self::Call => write!(f, "call"),
            Self::Fold => write!(f, "fold"),
        }
    }
}

/// Reads `null` the same as a missing field: the type's default.
fn nullable_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_game_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&GameId::new("game-1")).unwrap();
        assert_eq!(json, "\"game-1\"");
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new("A", "Spades").to_string(), "A of Spades");
    }

    #[test]
    fn test_snapshot_missing_sequences_default_to_empty() {
        let snap: GameSnapshot = serde_json::from_value(json!({ "pot": 50 })).unwrap();
        assert_eq!(snap.pot, 50);
        assert!(snap.players.is_empty());
        assert!(snap.community_cards.is_empty());
        assert_eq!(snap.highest_bet, 0);
        assert_eq!(snap.current_round, None);
    }

    #[test]
    fn test_snapshot_null_sequences_default_to_empty() {
        let snap: GameSnapshot = serde_json::from_value(json!({
            "pot": 10,
            "players": null,
            "community_cards": null,
            "highest_bet": null,
        }))
        .unwrap();
        assert!(snap.players.is_empty());
        assert!(snap.community_cards.is_empty());
        assert_eq!(snap.highest_bet, 0);
    }

    #[test]
    fn test_snapshot_without_pot_is_rejected() {
        let result: Result<GameSnapshot, _> =
            serde_json::from_value(json!({ "players": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_full_shape() {
        let snap: GameSnapshot = serde_json::from_value(json!({
            "pot": 120,
            "current_round": "flop",
            "current_player": "Bob",
            "highest_bet": 40,
            "community_cards": [
                {"rank": "10", "suit": "Hearts"},
                {"rank": "J", "suit": "Hearts"},
                {"rank": "Q", "suit": "Clubs"}
            ],
            "players": [
                {"name": "Alice", "chips": 950, "status": "active", "hand": [{"rank": "A", "suit": "Spades"}]},
                {"name": "Bob", "chips": 900, "status": "folded"}
            ]
        }))
        .unwrap();

        assert_eq!(snap.current_round.as_deref(), Some("flop"));
        assert_eq!(snap.community_cards.len(), 3);
        assert_eq!(snap.player("Alice").unwrap().hand.as_ref().unwrap().len(), 1);
        assert_eq!(snap.player("Bob").unwrap().hand, None);
        assert!(snap.player("Carol").is_none());
    }

    #[test]
    fn test_player_negative_chips_is_rejected() {
        let result: Result<PlayerView, _> = serde_json::from_value(json!({
            "name": "Alice", "chips": -5, "status": "active"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_player_without_hand_omits_field() {
        let player = PlayerView {
            name: "Alice".into(),
            chips: 1000,
            status: "active".into(),
            hand: None,
        };
        let json = serde_json::to_value(&player).unwrap();
        assert!(json.get("hand").is_none());
    }

    #[test]
    fn test_private_hand_requires_hand_field() {
        let result: Result<PrivateHand, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_action_kind_is_lowercase() {
        assert_eq!(serde_json::to_value(ActionKind::Raise).unwrap(), json!("raise"));
        assert_eq!(ActionKind::Fold.to_string(), "fold");
    }
}
