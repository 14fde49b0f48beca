//! Command dispatcher: turns user intents into outbound messages.
//!
//! Dispatch is split in two so nothing changes locally unless the network
//! accepted the frames:
//!
//! 1. [`prepare`] validates against a read-only store and builds the
//!    messages to send.
//! 2. After sending, [`Prepared::commit`] applies the local transition.

use cardsync_protocol::{ClientMessage, GameId};
use cardsync_session::{ConnectionStatus, SessionError, SessionStore};
use tracing::debug;

use crate::error::CommandError;

/// Something the local player wants to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RequestGameList,
    CreateGame,
    SetName(String),
    JoinGame(GameId),
    LeaveGame,
    /// Raise by the given amount, as typed by the user.
    PlaceBet(String),
    Call,
    Fold,
    RequestReveal,
}

impl Command {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestGameList => "request_game_list",
            Self::CreateGame => "create_game",
            Self::SetName(_) => "set_name",
            Self::JoinGame(_) => "join_game",
            Self::LeaveGame => "leave_game",
            Self::PlaceBet(_) => "place_bet",
            Self::Call => "call",
            Self::Fold => "fold",
            Self::RequestReveal => "request_reveal",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Effect {
    #[default]
    None,
    SetName(String),
    BeginJoin(GameId),
    ExitGame,
}

/// A validated command, ready to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prepared {
    outbound: Vec<ClientMessage>,
    effect: Effect,
}

impl Prepared {
    fn send(message: ClientMessage) -> Self {
        Self {
            outbound: vec![message],
            effect: Effect::None,
        }
    }

    fn noop(command: &'static str, status: ConnectionStatus) -> Self {
        debug!(command, %status, "command ignored");
        Self::default()
    }

    /// Messages to put on the wire, in order.
    pub fn outbound(&self) -> &[ClientMessage] {
        &self.outbound
    }

    /// Nothing to send and nothing to change.
    pub fn is_noop(&self) -> bool {
        self.outbound.is_empty() && self.effect == Effect::None
    }

    /// Whether committing abandons the current game, which also voids
    /// any pending round restart.
    pub fn leaves_game(&self) -> bool {
        self.effect == Effect::ExitGame
    }

    /// Applies the local side of the command. Returns whether the store
    /// changed.
    ///
    /// # Errors
    /// Returns the store's refusal when the state moved on since
    /// [`prepare`] ran.
    pub fn commit(self, store: &mut SessionStore) -> Result<bool, SessionError> {
        match self.effect {
            Effect::None => Ok(false),
            Effect::SetName(name) => {
                let changed = store.local_player_name() != Some(name.as_str());
                store.set_player_name(name)?;
                Ok(changed)
            }
            Effect::BeginJoin(game_id) => store.begin_join(game_id).map(|()| true),
            Effect::ExitGame => store.exit_game().map(|_| true),
        }
    }
}

/// Parses a bet typed by the user. Only positive whole numbers are bets.
///
/// # Errors
/// Returns [`CommandError::InvalidBet`] for anything else.
pub fn parse_bet(amount: &str) -> Result<u64, CommandError> {
    match amount.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidBet(amount.to_owned())),
    }
}

/// Validates `command` against the store and builds what to send.
///
/// # Errors
/// - [`CommandError::MissingName`] — joining (or naming) without a name
/// - [`CommandError::InvalidBet`] — the bet isn't a positive integer
/// - [`CommandError::InvalidState`] — joining twice, renaming mid-game
pub fn prepare(store: &SessionStore, command: Command) -> Result<Prepared, CommandError> {
    let status = store.status();
    let name = command.name();

    match command {
        Command::RequestGameList => Ok(Prepared::send(ClientMessage::GetGames {})),
        Command::CreateGame => Ok(Prepared::send(ClientMessage::CreateGame {})),

        Command::SetName(player_name) => {
            let player_name = player_name.trim();
            if player_name.is_empty() {
                return Err(CommandError::MissingName);
            }
            if store.session().membership().is_joined()
                && store.local_player_name() != Some(player_name)
            {
                return Err(CommandError::InvalidState {
                    command: name,
                    status,
                });
            }
            Ok(Prepared {
                outbound: Vec::new(),
                effect: Effect::SetName(player_name.to_owned()),
            })
        }

        Command::JoinGame(game_id) => {
            let Some(player_name) = store.local_player_name() else {
                return Err(CommandError::MissingName);
            };
            if store.session().membership().is_joined() {
                return Err(CommandError::InvalidState {
                    command: name,
                    status,
                });
            }
            Ok(Prepared {
                outbound: vec![ClientMessage::JoinGame {
                    game_id: game_id.clone(),
                    name: player_name.to_owned(),
                }],
                effect: Effect::BeginJoin(game_id),
            })
        }

        Command::LeaveGame => {
            let membership = store.session().membership();
            match (membership.game_id(), store.local_player_name()) {
                (Some(game_id), Some(player_name)) => Ok(Prepared {
                    outbound: vec![ClientMessage::LeaveGame {
                        game_id: game_id.clone(),
                        name: player_name.to_owned(),
                    }],
                    effect: Effect::ExitGame,
                }),
                // Offline: just forget the game queued for resync.
                _ if store.resume_game_id().is_some() => Ok(Prepared {
                    outbound: Vec::new(),
                    effect: Effect::ExitGame,
                }),
                _ => Ok(Prepared::noop(name, status)),
            }
        }

        Command::PlaceBet(amount) => {
            let amount = parse_bet(&amount)?;
            Ok(in_game(store, name, |game_id, player| {
                ClientMessage::raise(game_id, player, amount)
            }))
        }

        Command::Call => Ok(in_game(store, name, ClientMessage::call)),
        Command::Fold => Ok(in_game(store, name, ClientMessage::fold)),
        Command::RequestReveal => Ok(in_game(store, name, |game_id, _| {
            ClientMessage::Reveal { game_id }
        })),
    }
}

/// Builds a table action, or a no-op unless seated.
fn in_game(
    store: &SessionStore,
    command: &'static str,
    build: impl FnOnce(GameId, String) -> ClientMessage,
) -> Prepared {
    match (store.active_game_id(), store.local_player_name()) {
        (Some(game_id), Some(player)) => Prepared::send(build(game_id.clone(), player.to_owned())),
        _ => Prepared::noop(command, store.status()),
    }
}
