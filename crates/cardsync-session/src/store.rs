//! The session store: the single source of truth for what this client
//! currently believes.
//!
//! Every change goes through one of the transition methods below. Each
//! transition is total (it answers for every state, refusing with a
//! [`SessionError`] instead of panicking), all-or-nothing (a refused
//! transition leaves the store exactly as it was) and idempotent (applying
//! the same input twice ends in the same state as applying it once).
//!
//! # Concurrency note
//!
//! `SessionStore` has no interior locking. It is owned by the client actor
//! task and only ever touched from there.

use cardsync_protocol::{Card, GameId, GameSnapshot, PlayerView, PrivateHand};

use crate::{ConnectionStatus, Membership, Session, SessionError};

/// Everything the client knows: identity, membership, lobby, and the last
/// table state the server pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    session: Session,

    /// Joinable tables, in server order.
    lobby: Vec<GameId>,

    /// Last `game_state`, with every `hand` stripped.
    snapshot: Option<GameSnapshot>,

    /// The local player's cards, from `player_hand` or the local entry of a
    /// `game_state`.
    private_hand: Option<PrivateHand>,

    /// Game to resynchronize once the connection comes back.
    resume: Option<GameId>,
}

impl SessionStore {
    /// Creates an empty, disconnected store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> ConnectionStatus {
        self.session.status()
    }

    pub fn local_player_name(&self) -> Option<&str> {
        self.session.local_player_name()
    }

    /// `Some` exactly when the status is `InGame`.
    pub fn active_game_id(&self) -> Option<&GameId> {
        self.session.active_game_id()
    }

    /// The game a `join_game` is pending for.
    pub fn pending_game_id(&self) -> Option<&GameId> {
        match &self.session.membership {
            Membership::Joining { game_id } => Some(game_id),
            _ => None,
        }
    }

    pub fn lobby(&self) -> &[GameId] {
        &self.lobby
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn private_hand(&self) -> Option<&PrivateHand> {
        self.private_hand.as_ref()
    }

    /// The local player's cards, if any have been dealt.
    pub fn local_hand(&self) -> Option<&[Card]> {
        self.private_hand.as_ref().map(|h| h.hand.as_slice())
    }

    /// The local player's public seat in the current snapshot.
    pub fn local_player(&self) -> Option<&PlayerView> {
        let name = self.local_player_name()?;
        self.snapshot.as_ref()?.player(name)
    }

    /// The server-defined round name of the current snapshot.
    pub fn current_round(&self) -> Option<&str> {
        self.snapshot.as_ref()?.current_round.as_deref()
    }

    /// The game that will be resynchronized on reconnect.
    pub fn resume_game_id(&self) -> Option<&GameId> {
        self.resume.as_ref()
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Replaces the lobby wholesale. Allowed in every state.
    pub fn set_lobby(&mut self, games: Vec<GameId>) {
        self.lobby = games;
    }

    /// Sets the name the local player joins under.
    ///
    /// # Errors
    /// - [`SessionError::MissingName`] — the name is blank
    /// - [`SessionError::AlreadyJoined`] — renaming mid-game would orphan the
    ///   seat the server knows under the old name
    pub fn set_player_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::MissingName);
        }
        if let Some(game_id) = self.session.membership.game_id() {
            if self.local_player_name() != Some(name) {
                return Err(SessionError::AlreadyJoined(game_id.clone()));
            }
        }
        self.session.local_player_name = Some(name.to_owned());
        Ok(())
    }

    /// `LobbyOnly → Joining`.
    ///
    /// # Errors
    /// - [`SessionError::MissingName`] — no name set
    /// - [`SessionError::NotConnected`] — no connection
    /// - [`SessionError::AlreadyJoined`] — joining or seated elsewhere
    pub fn begin_join(&mut self, game_id: GameId) -> Result<(), SessionError> {
        if self.local_player_name().is_none() {
            return Err(SessionError::MissingName);
        }
        if let Some(current) = self.session.membership.game_id() {
            return Err(SessionError::AlreadyJoined(current.clone()));
        }
        if self.session.membership == Membership::Disconnected {
            return Err(SessionError::NotConnected);
        }
        tracing::debug!(%game_id, "joining game");
        self.session.membership = Membership::Joining { game_id };
        Ok(())
    }

    /// `Joining → InGame`. A no-op when already `InGame`.
    ///
    /// # Errors
    /// Returns [`SessionError::NotJoining`] from any other state.
    pub fn enter_game(&mut self) -> Result<&GameId, SessionError> {
        if let Membership::Joining { game_id } = &self.session.membership {
            let game_id = game_id.clone();
            tracing::info!(%game_id, "entered game");
            self.session.membership = Membership::InGame { game_id };
        }
        match &self.session.membership {
            Membership::InGame { game_id } => Ok(game_id),
            _ => Err(SessionError::NotJoining),
        }
    }

    /// Replaces the table snapshot, entering the game if a join is pending.
    ///
    /// Hands never reach the stored snapshot: the local player's embedded
    /// hand moves into the private-hand slot, anybody else's is dropped.
    /// Without an embedded local hand the private hand is left alone, so
    /// the order of `game_state` and `player_hand` doesn't matter.
    ///
    /// # Errors
    /// Returns [`SessionError::NotInGame`] unless joining or seated.
    pub fn apply_snapshot(&mut self, mut snapshot: GameSnapshot) -> Result<(), SessionError> {
        if !self.session.membership.is_joined() {
            return Err(SessionError::NotInGame);
        }
        self.enter_game()?;

        let local = self.session.local_player_name.as_deref();
        let mut local_hand = None;
        for player in &mut snapshot.players {
            let Some(hand) = player.hand.take() else {
                continue;
            };
            if Some(player.name.as_str()) == local {
                local_hand = Some(hand);
            } else {
                tracing::warn!(
                    player = %player.name,
                    "game_state carried another player's hand, dropped"
                );
            }
        }

        if let Some(hand) = local_hand {
            self.private_hand = Some(PrivateHand { hand });
        }
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Replaces the local player's private hand.
    ///
    /// # Errors
    /// - [`SessionError::MissingName`] — the hand can't be attributed
    /// - [`SessionError::NotInGame`] — not joining or seated
    pub fn apply_private_hand(&mut self, hand: PrivateHand) -> Result<(), SessionError> {
        if self.local_player_name().is_none() {
            return Err(SessionError::MissingName);
        }
        if !self.session.membership.is_joined() {
            return Err(SessionError::NotInGame);
        }
        self.private_hand = Some(hand);
        Ok(())
    }

    /// `Joining → LobbyOnly` after the server refused the join.
    ///
    /// Any hand or snapshot that arrived for the refused table is dropped.
    ///
    /// # Errors
    /// Returns [`SessionError::NotJoining`] when no join is pending.
    pub fn reject_join(&mut self) -> Result<GameId, SessionError> {
        match std::mem::take(&mut self.session.membership) {
            Membership::Joining { game_id } => {
                self.session.membership = Membership::LobbyOnly;
                self.snapshot = None;
                self.private_hand = None;
                Ok(game_id)
            }
            other => {
                self.session.membership = other;
                Err(SessionError::NotJoining)
            }
        }
    }

    /// Leaves the current game: back to `LobbyOnly`, table data cleared.
    ///
    /// While disconnected this forgets the game queued for resync instead.
    /// Returns the game that was left.
    ///
    /// # Errors
    /// Returns [`SessionError::NotInGame`] when there is nothing to leave.
    pub fn exit_game(&mut self) -> Result<GameId, SessionError> {
        let left = match std::mem::take(&mut self.session.membership) {
            Membership::Joining { game_id } | Membership::InGame { game_id } => {
                self.session.membership = Membership::LobbyOnly;
                game_id
            }
            Membership::Disconnected => match self.resume.take() {
                Some(game_id) => game_id,
                None => return Err(SessionError::NotInGame),
            },
            Membership::LobbyOnly => {
                self.session.membership = Membership::LobbyOnly;
                return Err(SessionError::NotInGame);
            }
        };
        self.snapshot = None;
        self.private_hand = None;
        tracing::info!(game_id = %left, "left game");
        Ok(left)
    }

    /// Forgets a game the server deleted.
    ///
    /// The id always leaves the lobby. Returns `true` when it was the game
    /// this client was joining or playing, which is then exited.
    pub fn remove_game(&mut self, game_id: &GameId) -> bool {
        self.lobby.retain(|id| id != game_id);

        if self.resume.as_ref() == Some(game_id) {
            self.resume = None;
            self.snapshot = None;
            self.private_hand = None;
        }
        if self.session.membership.game_id() == Some(game_id) {
            return self.exit_game().is_ok();
        }
        false
    }

    /// `Disconnected → LobbyOnly`, or straight back to `Joining` for the game
    /// that was open when the link dropped.
    ///
    /// Returns the game to resynchronize. A no-op when already connected.
    pub fn connection_established(&mut self) -> Option<GameId> {
        if self.session.membership != Membership::Disconnected {
            return None;
        }
        match self.resume.take() {
            Some(game_id) => {
                self.session.membership = Membership::Joining {
                    game_id: game_id.clone(),
                };
                Some(game_id)
            }
            None => {
                self.session.membership = Membership::LobbyOnly;
                None
            }
        }
    }

    /// Any state → `Disconnected`, remembering the open game for resync.
    ///
    /// The last snapshot stays visible (stale) until the next push.
    pub fn connection_lost(&mut self) {
        if let Some(game_id) = self.session.membership.game_id() {
            self.resume = Some(game_id.clone());
        }
        self.session.membership = Membership::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsync_protocol::Card;

    fn gid(id: &str) -> GameId {
        GameId::new(id)
    }

    fn player(name: &str, hand: Option<Vec<Card>>) -> PlayerView {
        PlayerView {
            name: name.into(),
            chips: 1000,
            status: "active".into(),
            hand,
        }
    }

    fn snapshot(pot: u64, players: Vec<PlayerView>) -> GameSnapshot {
        GameSnapshot {
            pot,
            players,
            ..GameSnapshot::default()
        }
    }

    /// A connected store with a name, joining `g1`.
    fn joining_store() -> SessionStore {
        let mut store = SessionStore::new();
        store.connection_established();
        store.set_player_name("Alice").unwrap();
        store.begin_join(gid("g1")).unwrap();
        store
    }

    // =====================================================================
    // Connection lifecycle
    // =====================================================================

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::new();
        assert_eq!(store.status(), ConnectionStatus::Disconnected);
        assert!(store.lobby().is_empty());
        assert!(store.snapshot().is_none());
        assert!(store.private_hand().is_none());
    }

    #[test]
    fn test_connection_established_enters_lobby() {
        let mut store = SessionStore::new();
        assert_eq!(store.connection_established(), None);
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
        // Second call is a no-op.
        assert_eq!(store.connection_established(), None);
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
    }

    #[test]
    fn test_connection_lost_remembers_game_for_resync() {
        let mut store = joining_store();
        store.apply_snapshot(snapshot(10, vec![])).unwrap();

        store.connection_lost();
        assert_eq!(store.status(), ConnectionStatus::Disconnected);
        assert_eq!(store.active_game_id(), None);
        assert_eq!(store.resume_game_id(), Some(&gid("g1")));
        assert!(store.snapshot().is_some(), "stale view stays visible");

        assert_eq!(store.connection_established(), Some(gid("g1")));
        assert_eq!(store.status(), ConnectionStatus::Joining);
        assert_eq!(store.pending_game_id(), Some(&gid("g1")));
        assert_eq!(store.resume_game_id(), None);
    }

    // =====================================================================
    // Naming and joining
    // =====================================================================

    #[test]
    fn test_set_player_name_trims_and_rejects_blank() {
        let mut store = SessionStore::new();
        assert_eq!(store.set_player_name("   "), Err(SessionError::MissingName));
        store.set_player_name("  Bob ").unwrap();
        assert_eq!(store.local_player_name(), Some("Bob"));
    }

    #[test]
    fn test_rename_while_joined_is_refused() {
        let mut store = joining_store();
        assert_eq!(
            store.set_player_name("Mallory"),
            Err(SessionError::AlreadyJoined(gid("g1")))
        );
        // Same name again is fine.
        assert!(store.set_player_name("Alice").is_ok());
        assert_eq!(store.local_player_name(), Some("Alice"));
    }

    #[test]
    fn test_begin_join_requires_name_and_connection() {
        let mut store = SessionStore::new();
        assert_eq!(store.begin_join(gid("g1")), Err(SessionError::MissingName));

        store.set_player_name("Alice").unwrap();
        assert_eq!(store.begin_join(gid("g1")), Err(SessionError::NotConnected));

        store.connection_established();
        store.begin_join(gid("g1")).unwrap();
        assert_eq!(store.status(), ConnectionStatus::Joining);
        assert_eq!(store.active_game_id(), None);
        assert_eq!(
            store.begin_join(gid("g2")),
            Err(SessionError::AlreadyJoined(gid("g1")))
        );
    }

    #[test]
    fn test_enter_game_is_idempotent() {
        let mut store = joining_store();
        assert_eq!(store.enter_game().unwrap(), &gid("g1"));
        assert_eq!(store.enter_game().unwrap(), &gid("g1"));
        assert_eq!(store.status(), ConnectionStatus::InGame);
    }

    #[test]
    fn test_enter_game_from_lobby_is_refused() {
        let mut store = SessionStore::new();
        store.connection_established();
        assert_eq!(store.enter_game(), Err(SessionError::NotJoining));
    }

    #[test]
    fn test_reject_join_rolls_back_to_lobby() {
        let mut store = joining_store();
        assert_eq!(store.reject_join(), Ok(gid("g1")));
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
        assert_eq!(store.reject_join(), Err(SessionError::NotJoining));
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
    }

    #[test]
    fn test_rejected_join_does_not_carry_hand_to_next_table() {
        let mut store = joining_store();
        store
            .apply_private_hand(PrivateHand {
                hand: vec![Card::new("A", "Spades")],
            })
            .unwrap();

        assert_eq!(store.reject_join(), Ok(gid("g1")));
        assert_eq!(store.local_hand(), None);
        assert_eq!(store.snapshot(), None);

        store.begin_join(gid("g2")).unwrap();
        store
            .apply_snapshot(snapshot(10, vec![player("Alice", None)]))
            .unwrap();

        assert_eq!(store.active_game_id(), Some(&gid("g2")));
        assert_eq!(store.local_hand(), None);
        assert_eq!(store.snapshot().map(|s| s.pot), Some(10));
    }

    // =====================================================================
    // Snapshots and hands
    // =====================================================================

    #[test]
    fn test_apply_snapshot_outside_game_leaves_store_untouched() {
        let mut store = SessionStore::new();
        store.connection_established();
        let before = store.clone();
        assert_eq!(
            store.apply_snapshot(snapshot(5, vec![])),
            Err(SessionError::NotInGame)
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_apply_snapshot_enters_game_and_replaces_wholesale() {
        let mut store = joining_store();
        store
            .apply_snapshot(snapshot(50, vec![player("Alice", None), player("Bob", None)]))
            .unwrap();
        assert_eq!(store.status(), ConnectionStatus::InGame);
        assert_eq!(store.active_game_id(), Some(&gid("g1")));

        store.apply_snapshot(snapshot(70, vec![player("Alice", None)])).unwrap();
        let snap = store.snapshot().unwrap();
        assert_eq!(snap.pot, 70);
        assert_eq!(snap.players.len(), 1);
    }

    #[test]
    fn test_apply_snapshot_moves_local_hand_and_drops_others() {
        let mut store = joining_store();
        let mine = vec![Card::new("A", "Spades"), Card::new("K", "Spades")];
        let theirs = vec![Card::new("2", "Clubs"), Card::new("7", "Hearts")];
        store
            .apply_snapshot(snapshot(
                0,
                vec![player("Alice", Some(mine.clone())), player("Bob", Some(theirs))],
            ))
            .unwrap();

        assert_eq!(store.local_hand(), Some(mine.as_slice()));
        let snap = store.snapshot().unwrap();
        assert!(snap.players.iter().all(|p| p.hand.is_none()));
        assert_eq!(store.local_player().unwrap().name, "Alice");
    }

    #[test]
    fn test_apply_snapshot_without_local_hand_keeps_private_hand() {
        let mut store = joining_store();
        let hand = PrivateHand {
            hand: vec![Card::new("Q", "Diamonds")],
        };
        store.apply_private_hand(hand.clone()).unwrap();
        store.apply_snapshot(snapshot(5, vec![player("Alice", None)])).unwrap();
        assert_eq!(store.private_hand(), Some(&hand));
    }

    #[test]
    fn test_apply_private_hand_requires_name_and_game() {
        let mut store = SessionStore::new();
        store.connection_established();
        let hand = PrivateHand::default();
        assert_eq!(
            store.apply_private_hand(hand.clone()),
            Err(SessionError::MissingName)
        );
        store.set_player_name("Alice").unwrap();
        assert_eq!(
            store.apply_private_hand(hand),
            Err(SessionError::NotInGame)
        );
        assert!(store.private_hand().is_none());
    }

    #[test]
    fn test_current_round_reads_snapshot() {
        let mut store = joining_store();
        assert_eq!(store.current_round(), None);
        store
            .apply_snapshot(GameSnapshot {
                current_round: Some("turn".into()),
                ..GameSnapshot::default()
            })
            .unwrap();
        assert_eq!(store.current_round(), Some("turn"));
    }

    // =====================================================================
    // Leaving and deletion
    // =====================================================================

    #[test]
    fn test_exit_game_clears_table_data_and_keeps_name() {
        let mut store = joining_store();
        store.apply_snapshot(snapshot(5, vec![player("Alice", Some(vec![]))])).unwrap();

        assert_eq!(store.exit_game(), Ok(gid("g1")));
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
        assert!(store.snapshot().is_none());
        assert!(store.private_hand().is_none());
        assert_eq!(store.local_player_name(), Some("Alice"));

        assert_eq!(store.exit_game(), Err(SessionError::NotInGame));
    }

    #[test]
    fn test_exit_game_while_disconnected_forgets_resume() {
        let mut store = joining_store();
        store.connection_lost();
        assert_eq!(store.exit_game(), Ok(gid("g1")));
        assert_eq!(store.resume_game_id(), None);
        assert_eq!(store.status(), ConnectionStatus::Disconnected);
        assert_eq!(store.connection_established(), None);
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
    }

    #[test]
    fn test_remove_game_for_active_game() {
        let mut store = joining_store();
        store.set_lobby(vec![gid("g1"), gid("g2")]);
        store.apply_snapshot(snapshot(5, vec![])).unwrap();

        assert!(store.remove_game(&gid("g1")));
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
        assert_eq!(store.active_game_id(), None);
        assert_eq!(store.lobby(), &[gid("g2")]);
    }

    #[test]
    fn test_remove_game_while_joining_cancels_join() {
        let mut store = joining_store();
        store.set_lobby(vec![gid("g1"), gid("g2")]);

        assert!(store.remove_game(&gid("g1")));
        assert_eq!(store.status(), ConnectionStatus::LobbyOnly);
        assert_eq!(store.pending_game_id(), None);
        assert_eq!(store.active_game_id(), None);
        assert_eq!(store.lobby(), &[gid("g2")]);
    }

    #[test]
    fn test_remove_other_game_only_prunes_lobby() {
        let mut store = joining_store();
        store.set_lobby(vec![gid("g1"), gid("g2")]);
        store.apply_snapshot(snapshot(5, vec![])).unwrap();

        assert!(!store.remove_game(&gid("g2")));
        assert_eq!(store.status(), ConnectionStatus::InGame);
        assert_eq!(store.lobby(), &[gid("g1")]);
    }
}
