//! View projector: a render-ready picture of the store.
//!
//! [`project`] is a pure function of the [`SessionStore`]. A front end
//! calls it on every `StateChanged` event and redraws from the result; it
//! never needs to look at the store's internals.

use std::fmt;

use cardsync_protocol::{Card, GameId};
use cardsync_session::{ConnectionStatus, SessionStore};

/// What the front end should be showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// No connection. `resuming` is the table we'll return to.
    Offline { resuming: Option<GameId> },
    /// Browsing the lobby.
    Lobby { games: Vec<GameId> },
    /// Waiting for the first table state after `join_game`.
    Joining { game_id: GameId },
    /// Seated at a table.
    Table(TableView),
}

/// A table as seen by the local player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub game_id: GameId,
    pub round: Option<String>,
    pub pot: u64,
    pub highest_bet: u64,
    pub community_cards: Vec<Card>,
    pub seats: Vec<SeatView>,
    /// The local player's cards; empty until dealt.
    pub hand: Vec<Card>,
    /// It is the local player's turn.
    pub to_act: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatView {
    pub name: String,
    pub chips: u64,
    pub status: String,
    pub is_local: bool,
    pub is_current: bool,
}

/// Projects the store into a [`View`].
pub fn project(store: &SessionStore) -> View {
    if let Some(game_id) = store.active_game_id() {
        return View::Table(table(store, game_id.clone()));
    }
    if let Some(game_id) = store.pending_game_id() {
        return View::Joining {
            game_id: game_id.clone(),
        };
    }
    match store.status() {
        ConnectionStatus::Disconnected => View::Offline {
            resuming: store.resume_game_id().cloned(),
        },
        _ => View::Lobby {
            games: store.lobby().to_vec(),
        },
    }
}

fn table(store: &SessionStore, game_id: GameId) -> TableView {
    let local = store.local_player_name();
    let hand = store.local_hand().map(<[Card]>::to_vec).unwrap_or_default();

    let Some(snapshot) = store.snapshot() else {
        return TableView {
            game_id,
            round: None,
            pot: 0,
            highest_bet: 0,
            community_cards: Vec::new(),
            seats: Vec::new(),
            hand,
            to_act: false,
        };
    };

    let current = snapshot.current_player.as_deref();
    let seats = snapshot
        .players
        .iter()
        .map(|p| SeatView {
            name: p.name.clone(),
            chips: p.chips,
            status: p.status.clone(),
            is_local: Some(p.name.as_str()) == local,
            is_current: Some(p.name.as_str()) == current,
        })
        .collect();

    TableView {
        game_id,
        round: snapshot.current_round.clone(),
        pot: snapshot.pot,
        highest_bet: snapshot.highest_bet,
        community_cards: snapshot.community_cards.clone(),
        seats,
        hand,
        to_act: current.is_some() && current == local,
    }
}

fn write_cards(f: &mut fmt::Formatter<'_>, cards: &[Card]) -> fmt::Result {
    if cards.is_empty() {
        return write!(f, "-");
    }
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{card}")?;
    }
    Ok(())
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline { resuming: None } => write!(f, "offline"),
            Self::Offline {
                resuming: Some(game_id),
            } => write!(f, "offline (will rejoin {game_id})"),
            Self::Lobby { games } if games.is_empty() => write!(f, "lobby: no open tables"),
            Self::Lobby { games } => {
                writeln!(f, "lobby:")?;
                for (i, game_id) in games.iter().enumerate() {
                    writeln!(f, "  {}. {game_id}", i + 1)?;
                }
                Ok(())
            }
            Self::Joining { game_id } => write!(f, "joining {game_id}..."),
            Self::Table(table) => write!(f, "{table}"),
        }
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {}", self.game_id)?;
        if let Some(round) = &self.round {
            write!(f, " [{round}]")?;
        }
        writeln!(f)?;
        writeln!(f, "pot: {}  highest bet: {}", self.pot, self.highest_bet)?;
        write!(f, "board: ")?;
        write_cards(f, &self.community_cards)?;
        writeln!(f)?;
        for seat in &self.seats {
            let marker = if seat.is_current { "->" } else { "  " };
            let you = if seat.is_local { " (you)" } else { "" };
            writeln!(
                f,
                "{marker} {}{you}  {} chips  {}",
                seat.name, seat.chips, seat.status
            )?;
        }
        write!(f, "your hand: ")?;
        write_cards(f, &self.hand)?;
        if self.to_act {
            write!(f, "\nyour turn")?;
        }
        Ok(())
    }
}
