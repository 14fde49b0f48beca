//! Error types for the session layer.

/// A transition the store refused.
///
/// A refused transition never changes the store: callers can log the error
/// and carry on with the state they already had.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The transition needs a live connection.
    #[error("not connected")]
    NotConnected,

    /// The transition needs the session to be joining or in a game.
    #[error("not in a game")]
    NotInGame,

    /// The transition needs a pending join.
    #[error("no join in progress")]
    NotJoining,

    /// The session already belongs to a game.
    #[error("already joined game {0}")]
    AlreadyJoined(cardsync_protocol::GameId),

    /// No local player name has been set.
    #[error("local player name is not set")]
    MissingName,
}
