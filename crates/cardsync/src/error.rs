//! Unified error type for the cardsync client.

use cardsync_protocol::ProtocolError;
use cardsync_session::{ConnectionStatus, SessionError};
use cardsync_transport::TransportError;

/// A command rejected locally, before anything reached the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Joining needs a player name.
    #[error("a player name is required")]
    MissingName,

    /// The bet amount isn't a positive integer.
    #[error("invalid bet amount: {0:?}")]
    InvalidBet(String),

    /// The command makes no sense in the current state.
    #[error("cannot {command} while {status}")]
    InvalidState {
        command: &'static str,
        status: ConnectionStatus,
    },
}

/// Anything a [`ClientHandle`](crate::ClientHandle) call or the client task
/// can fail with. Lower-layer errors convert in through `?`.
#[derive(Debug, thiserror::Error)]
pub enum CardsyncError {
    /// The link to the server failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be built or read.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session store refused a transition.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A command failed local validation.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A command needed the server while the connection was down.
    #[error("not connected to the game server")]
    NotConnected,

    /// The client task is gone.
    #[error("client has shut down")]
    ClientClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_converts() {
        let err = TransportError::ConnectionClosed("gone".into());
        let err: CardsyncError = err.into();
        assert!(matches!(err, CardsyncError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_protocol_failure_converts() {
        let err = ProtocolError::InvalidMessage("raise without amount".into());
        let err: CardsyncError = err.into();
        assert!(matches!(err, CardsyncError::Protocol(_)));
    }

    #[test]
    fn test_refused_transition_converts() {
        let err: CardsyncError = SessionError::NotInGame.into();
        assert!(matches!(err, CardsyncError::Session(SessionError::NotInGame)));
    }

    #[test]
    fn test_command_error_display() {
        assert_eq!(
            CommandError::InvalidBet("-5".into()).to_string(),
            "invalid bet amount: \"-5\""
        );
        let err = CommandError::InvalidState {
            command: "join_game",
            status: ConnectionStatus::InGame,
        };
        assert_eq!(err.to_string(), "cannot join_game while InGame");
    }
}
