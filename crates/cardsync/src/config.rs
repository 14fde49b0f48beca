//! Client configuration.

use std::time::Duration;

use tracing::warn;

/// Server endpoint used when none is configured.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:5000/ws";

/// Tunables for a [`Client`](crate::Client).
///
/// Every field has a usable default; the `with_*` setters chain:
///
/// ```
/// use std::time::Duration;
/// use cardsync::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_url("ws://cards.local/ws")
///     .with_restart_delay(Duration::from_secs(3))
///     .with_max_reconnect_attempts(None);
/// assert_eq!(config.url, "ws://cards.local/ws");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server.
    pub url: String,

    /// How long after a `game_result` the next round is requested.
    pub restart_delay: Duration,

    /// Base wait between a lost connection and the next attempt.
    pub reconnect_delay: Duration,

    /// Upper bound of the random extra wait added to `reconnect_delay`.
    pub reconnect_jitter: Duration,

    /// Consecutive failed attempts before giving up. `None` retries forever.
    pub max_reconnect_attempts: Option<u32>,

    /// Capacity of the [`ClientEvent`](crate::ClientEvent) channel.
    /// Minimum: 1.
    pub event_channel_capacity: usize,

    /// Capacity of the request channel behind [`ClientHandle`](crate::ClientHandle).
    /// Minimum: 1.
    pub request_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            restart_delay: Duration::from_secs(5),
            reconnect_delay: Duration::from_secs(1),
            reconnect_jitter: Duration::from_millis(250),
            max_reconnect_attempts: Some(10),
            event_channel_capacity: 256,
            request_channel_capacity: 32,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    #[must_use]
    pub fn with_reconnect_jitter(mut self, jitter: Duration) -> Self {
        self.reconnect_jitter = jitter;
        self
    }

    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: Option<u32>) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Returns a copy with out-of-range values clamped.
    ///
    /// Zero channel capacities would make `tokio::sync::mpsc` panic, so
    /// they are raised to 1 with a warning.
    pub fn validated(mut self) -> Self {
        if self.event_channel_capacity == 0 {
            warn!("event_channel_capacity was 0, clamped to 1");
            self.event_channel_capacity = 1;
        }
        if self.request_channel_capacity == 0 {
            warn!("request_channel_capacity was 0, clamped to 1");
            self.request_channel_capacity = 1;
        }
        if self.max_reconnect_attempts == Some(0) {
            warn!("max_reconnect_attempts was 0, reconnecting disabled");
        }
        self
    }
}
