//! Event router: folds server pushes into the session store.
//!
//! [`route`] is a pure reducer. It never touches the network or the clock;
//! everything the caller has to do afterwards (tell the UI, arm or cancel
//! the restart timer) comes back in [`Routed`].

use cardsync_protocol::{GameId, ServerMessage};
use cardsync_session::{ConnectionStatus, SessionError, SessionStore};
use tracing::{debug, info, warn};

/// A one-off event for the user, as opposed to a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The server refused to seat us.
    JoinRejected {
        game_id: Option<GameId>,
        message: String,
    },

    /// The table we were at (or joining) was deleted.
    GameClosed { game_id: GameId },

    /// A round at our table finished. `winner` is `None` when the server
    /// named nobody.
    RoundFinished { winner: Option<String>, pot: u64 },
}

/// What to do with the deferred `start_new_game`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartDirective {
    /// Request a new round for this game after the restart delay.
    Schedule(GameId),
    /// Drop any pending request.
    Cancel,
}

/// Outcome of routing one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routed {
    /// The store was modified.
    pub changed: bool,
    pub notices: Vec<Notice>,
    pub restart: Option<RestartDirective>,
}

impl Routed {
    fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    fn ignored(event: &str, status: ConnectionStatus, reason: &SessionError) -> Self {
        debug!(event, %status, %reason, "event ignored");
        Self::default()
    }
}

/// Applies one inbound message to the store.
///
/// Messages that don't fit the current state are ignored and leave the
/// store exactly as it was.
pub fn route(store: &mut SessionStore, message: ServerMessage) -> Routed {
    let event = message.event_name();
    let status = store.status();

    match message {
        ServerMessage::UpdateGames(games) => {
            debug!(count = games.len(), "lobby updated");
            store.set_lobby(games);
            Routed::changed()
        }

        ServerMessage::JoinError { message } => match store.reject_join() {
            Ok(game_id) => {
                info!(%game_id, %message, "join rejected");
                Routed {
                    changed: true,
                    notices: vec![Notice::JoinRejected {
                        game_id: Some(game_id),
                        message,
                    }],
                    restart: None,
                }
            }
            Err(e) => Routed::ignored(event, status, &e),
        },

        ServerMessage::GameState(snapshot) => match store.apply_snapshot(snapshot) {
            Ok(()) => Routed::changed(),
            Err(e) => Routed::ignored(event, status, &e),
        },

        ServerMessage::PlayerHand(hand) => match store.apply_private_hand(hand) {
            Ok(()) => Routed::changed(),
            Err(SessionError::MissingName) => {
                warn!("player_hand arrived without a local player name, dropped");
                Routed::default()
            }
            Err(e) => Routed::ignored(event, status, &e),
        },

        ServerMessage::GameDeleted { game_id } => {
            let before = store.clone();
            let closed_local = store.remove_game(&game_id);
            let mut routed = Routed {
                changed: *store != before,
                ..Routed::default()
            };
            if closed_local {
                info!(%game_id, "our game was deleted");
                routed.notices.push(Notice::GameClosed { game_id });
                routed.restart = Some(RestartDirective::Cancel);
            }
            routed
        }

        ServerMessage::GameResult(result) => {
            let Some(game_id) = store.active_game_id().cloned() else {
                return Routed::ignored(event, status, &SessionError::NotInGame);
            };
            info!(%game_id, winner = ?result.winner, pot = result.pot, "round finished");
            Routed {
                changed: false,
                notices: vec![Notice::RoundFinished {
                    winner: result.winner,
                    pot: result.pot,
                }],
                restart: Some(RestartDirective::Schedule(game_id)),
            }
        }
    }
}
