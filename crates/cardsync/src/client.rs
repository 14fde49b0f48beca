//! Client actor: one Tokio task that owns the whole session.
//!
//! The store, the connection and the restart timer all live inside
//! [`Client`] and are only touched from its task, so nothing here needs a
//! lock. The outside world talks to it through a [`ClientHandle`] and
//! listens on a channel of [`ClientEvent`]s.

use cardsync_protocol::{ClientMessage, Codec, GameId, JsonCodec};
use cardsync_session::SessionStore;
use cardsync_timer::DeferredTimer;
use cardsync_transport::{Connector, TransportError};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace, warn};

use crate::config::ClientConfig;
use crate::connection::{ConnectOutcome, ConnectionManager, Inbound};
use crate::dispatcher::{self, Command};
use crate::error::CardsyncError;
use crate::router::{self, Notice, RestartDirective, Routed};

/// Something the front end should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A connection to the server is up.
    Connected,
    /// The connection dropped; a reconnect may follow.
    Disconnected { reason: String },
    /// The store changed. Carries a copy to render from.
    StateChanged(Box<SessionStore>),
    /// A one-off message for the user.
    Notice(Notice),
}

impl ClientEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected { .. } => "disconnected",
            Self::StateChanged(_) => "state_changed",
            Self::Notice(_) => "notice",
        }
    }
}

/// Requests sent from a [`ClientHandle`] to the client task.
///
/// The `oneshot::Sender` is the reply channel: the handle waits on it so
/// local validation errors come back to the caller directly.
enum Request {
    Command {
        command: Command,
        reply: oneshot::Sender<Result<(), CardsyncError>>,
    },
    State {
        reply: oneshot::Sender<SessionStore>,
    },
    Shutdown,
}

/// Cheap, cloneable handle to a running [`Client`].
///
/// Dropping every handle shuts the client down.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    sender: mpsc::Sender<Request>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command { command, .. } => write!(f, "Command({command:?})"),
            Self::State { .. } => write!(f, "State"),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl ClientHandle {
    /// Runs a [`Command`] on the client task and waits for the verdict.
    ///
    /// # Errors
    /// Whatever the command failed with, or [`CardsyncError::ClientClosed`]
    /// when the client task is gone.
    pub async fn execute(&self, command: Command) -> Result<(), CardsyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Request::Command {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| CardsyncError::ClientClosed)?;
        reply_rx.await.map_err(|_| CardsyncError::ClientClosed)?
    }

    pub async fn request_game_list(&self) -> Result<(), CardsyncError> {
        self.execute(Command::RequestGameList).await
    }

    pub async fn create_game(&self) -> Result<(), CardsyncError> {
        self.execute(Command::CreateGame).await
    }

    pub async fn set_name(&self, name: impl Into<String>) -> Result<(), CardsyncError> {
        self.execute(Command::SetName(name.into())).await
    }

    pub async fn join_game(&self, game_id: impl Into<GameId>) -> Result<(), CardsyncError> {
        self.execute(Command::JoinGame(game_id.into())).await
    }

    pub async fn leave_game(&self) -> Result<(), CardsyncError> {
        self.execute(Command::LeaveGame).await
    }

    /// Raises by `amount`, exactly as the user typed it.
    pub async fn place_bet(&self, amount: impl Into<String>) -> Result<(), CardsyncError> {
        self.execute(Command::PlaceBet(amount.into())).await
    }

    pub async fn call(&self) -> Result<(), CardsyncError> {
        self.execute(Command::Call).await
    }

    pub async fn fold(&self) -> Result<(), CardsyncError> {
        self.execute(Command::Fold).await
    }

    pub async fn request_reveal(&self) -> Result<(), CardsyncError> {
        self.execute(Command::RequestReveal).await
    }

    /// A copy of the store as the client task sees it right now.
    pub async fn state(&self) -> Result<SessionStore, CardsyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Request::State { reply: reply_tx })
            .await
            .map_err(|_| CardsyncError::ClientClosed)?;
        reply_rx.await.map_err(|_| CardsyncError::ClientClosed)
    }

    /// Asks the client to close the connection and stop.
    pub async fn shutdown(&self) -> Result<(), CardsyncError> {
        self.sender
            .send(Request::Shutdown)
            .await
            .map_err(|_| CardsyncError::ClientClosed)
    }

    /// Whether the client task is still running.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// The client actor.
pub struct Client<K: Connector, C: Codec = JsonCodec> {
    config: ClientConfig,
    store: SessionStore,
    connection: ConnectionManager<K, C>,
    restart: DeferredTimer<GameId>,
    requests: mpsc::Receiver<Request>,
    events: mpsc::Sender<ClientEvent>,
}

impl<K: Connector> Client<K> {
    /// Builds a JSON-speaking client without starting it.
    pub fn new(
        config: ClientConfig,
        connector: K,
    ) -> (Self, ClientHandle, mpsc::Receiver<ClientEvent>) {
        Self::with_codec(config, connector, JsonCodec)
    }

    /// Spawns a JSON-speaking client on the current runtime.
    ///
    /// Use [`Client::new`] and [`Client::run`] instead to observe how the
    /// client ended.
    pub fn start(
        config: ClientConfig,
        connector: K,
    ) -> (ClientHandle, mpsc::Receiver<ClientEvent>) {
        let (client, handle, events) = Self::new(config, connector);
        tokio::spawn(client.run());
        (handle, events)
    }
}

impl<K: Connector, C: Codec> Client<K, C> {
    pub fn with_codec(
        config: ClientConfig,
        connector: K,
        codec: C,
    ) -> (Self, ClientHandle, mpsc::Receiver<ClientEvent>) {
        let config = config.validated();
        let (request_tx, request_rx) = mpsc::channel(config.request_channel_capacity);
        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity);
        let client = Self {
            connection: ConnectionManager::new(connector, codec, &config),
            config,
            store: SessionStore::new(),
            restart: DeferredTimer::new(),
            requests: request_rx,
            events: event_tx,
        };
        (client, ClientHandle { sender: request_tx }, event_rx)
    }

    /// Runs until shut down or until reconnecting is given up.
    ///
    /// # Errors
    /// Returns the last transport error once the reconnect budget is spent.
    pub async fn run(mut self) -> Result<(), CardsyncError> {
        info!(url = %self.config.url, "client starting");
        let result = self.drive().await;
        self.restart.cancel();
        self.connection.close().await;
        match &result {
            Ok(()) => info!("client stopped"),
            Err(e) => error!(error = %e, "client stopped"),
        }
        result
    }

    async fn drive(&mut self) -> Result<(), CardsyncError> {
        self.attempt_connect().await?;

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(Request::Command { command, reply }) => {
                        let result = self.execute(command).await;
                        let _ = reply.send(result);
                    }
                    Some(Request::State { reply }) => {
                        let _ = reply.send(self.store.clone());
                    }
                    Some(Request::Shutdown) | None => return Ok(()),
                },
                inbound = self.connection.recv() => self.handle_inbound(inbound)?,
                () = self.connection.wait_reconnect() => self.attempt_connect().await?,
                game_id = self.restart.fired() => self.request_new_round(game_id).await,
            }
        }
    }

    // -----------------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------------

    async fn attempt_connect(&mut self) -> Result<(), CardsyncError> {
        match self.connection.connect().await {
            ConnectOutcome::Connected(_) => {
                self.on_connected().await;
                Ok(())
            }
            ConnectOutcome::RetryIn(delay) => {
                debug!(delay_ms = delay.as_millis() as u64, "next connect attempt scheduled");
                Ok(())
            }
            ConnectOutcome::GaveUp(e) => Err(e.into()),
        }
    }

    /// Resynchronizes with the server: the lobby always, the table when we
    /// were at one before the link dropped.
    async fn on_connected(&mut self) {
        let resume = self.store.connection_established();
        self.emit(ClientEvent::Connected);

        self.send_best_effort(&ClientMessage::GetGames {}).await;
        if let Some(game_id) = resume {
            info!(%game_id, "resynchronizing table");
            self.send_best_effort(&ClientMessage::GetGameState {}).await;
        }
        self.publish_state();
    }

    fn on_connection_lost(&mut self, error: Option<TransportError>) -> Result<(), CardsyncError> {
        let reason = match error {
            Some(e) => e.to_string(),
            None => "closed by server".to_owned(),
        };
        warn!(%reason, "connection lost");

        self.store.connection_lost();
        self.restart.cancel();
        self.emit(ClientEvent::Disconnected {
            reason: reason.clone(),
        });
        self.publish_state();

        match self.connection.connection_lost() {
            Some(delay) => {
                info!(delay_ms = delay.as_millis() as u64, "reconnecting");
                Ok(())
            }
            None => Err(TransportError::ConnectionClosed(reason).into()),
        }
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    fn handle_inbound(&mut self, inbound: Inbound) -> Result<(), CardsyncError> {
        match inbound {
            Inbound::Message(message) => {
                let routed = router::route(&mut self.store, message);
                self.apply_routed(routed);
                Ok(())
            }
            Inbound::Malformed(e) => {
                warn!(error = %e, "malformed frame dropped");
                Ok(())
            }
            Inbound::Closed(error) => self.on_connection_lost(error),
        }
    }

    fn apply_routed(&mut self, routed: Routed) {
        match routed.restart {
            Some(RestartDirective::Schedule(game_id)) => {
                self.restart.schedule(self.config.restart_delay, game_id);
            }
            Some(RestartDirective::Cancel) => {
                self.restart.cancel();
            }
            None => {}
        }
        if routed.changed {
            self.publish_state();
        }
        for notice in routed.notices {
            self.emit(ClientEvent::Notice(notice));
        }
    }

    /// Fires the deferred `start_new_game`, unless we left in the meantime.
    async fn request_new_round(&mut self, game_id: GameId) {
        if self.store.active_game_id() != Some(&game_id) {
            debug!(%game_id, "restart skipped, no longer at the table");
            return;
        }
        info!(%game_id, "requesting next round");
        self.send_best_effort(&ClientMessage::StartNewGame {}).await;
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    async fn execute(&mut self, command: Command) -> Result<(), CardsyncError> {
        let name = command.name();
        let prepared = dispatcher::prepare(&self.store, command)?;
        if prepared.is_noop() {
            return Ok(());
        }
        if !prepared.outbound().is_empty() && !self.connection.is_connected() {
            debug!(command = name, "refused while disconnected");
            return Err(CardsyncError::NotConnected);
        }

        for message in prepared.outbound() {
            self.connection.send(message).await?;
        }
        if prepared.leaves_game() {
            self.restart.cancel();
        }
        if prepared.commit(&mut self.store)? {
            self.publish_state();
        }
        debug!(command = name, "command dispatched");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    async fn send_best_effort(&self, message: &ClientMessage) {
        if let Err(e) = self.connection.send(message).await {
            warn!(event = message.event_name(), error = %e, "send failed");
        }
    }

    fn publish_state(&self) {
        self.emit(ClientEvent::StateChanged(Box::new(self.store.clone())));
    }

    fn emit(&self, event: ClientEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(event = event.kind(), "event channel full, event dropped");
            }
            Err(TrySendError::Closed(_)) => trace!("no event listener"),
        }
    }
}
