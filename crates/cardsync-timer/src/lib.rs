//! Cancellable deferred commands for cardsync.
//!
//! A [`DeferredTimer`] holds at most one pending payload and a deadline.
//! The client arms it when something should happen "later" (requesting a
//! new round a few seconds after a result) and cancels it when the reason
//! goes away (the player left the table).
//!
//! # Integration
//!
//! The timer is designed to sit inside the client actor's `tokio::select!`
//! loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(req) = requests.recv() => { /* may call timer.cancel() */ }
//!         game_id = timer.fired() => { /* emit the deferred command */ }
//!     }
//! }
//! ```
//!
//! While nothing is armed, [`DeferredTimer::fired`] pends forever, so the
//! branch simply never wins.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Counters describing what a timer has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerStats {
    /// Times a payload was armed (including re-arms).
    pub scheduled: u64,
    /// Payloads delivered by [`DeferredTimer::fired`].
    pub fired: u64,
    /// Payloads discarded by [`DeferredTimer::cancel`] or replaced by a
    /// later [`DeferredTimer::schedule`].
    pub cancelled: u64,
}

/// A one-shot timer carrying a payload of type `T`.
#[derive(Debug)]
pub struct DeferredTimer<T> {
    armed: Option<(Instant, T)>,
    stats: TimerStats,
}

impl<T> Default for DeferredTimer<T> {
    fn default() -> Self {
        Self {
            armed: None,
            stats: TimerStats::default(),
        }
    }
}

impl<T> DeferredTimer<T> {
    /// Creates an unarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to deliver `payload` after `delay`.
    ///
    /// Only one payload is ever pending: arming again replaces (and
    /// returns) the previous one and restarts the countdown.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> Option<T> {
        let deadline = Instant::now() + delay;
        let replaced = self.armed.replace((deadline, payload)).map(|(_, p)| p);
        self.stats.scheduled += 1;
        if replaced.is_some() {
            self.stats.cancelled += 1;
        }
        debug!(
            delay_ms = delay.as_millis() as u64,
            replaced = replaced.is_some(),
            "deferred command scheduled"
        );
        replaced
    }

    /// Disarms the timer, returning the payload that will now never fire.
    ///
    /// Safe to call when nothing is armed.
    pub fn cancel(&mut self) -> Option<T> {
        let cancelled = self.armed.take().map(|(_, p)| p);
        if cancelled.is_some() {
            self.stats.cancelled += 1;
            debug!("deferred command cancelled");
        }
        cancelled
    }

    /// Waits for the armed deadline and hands back the payload.
    ///
    /// Pends forever while unarmed. Cancel-safe: dropping this future
    /// before the deadline leaves the timer armed.
    pub async fn fired(&mut self) -> T {
        let Some(deadline) = self.deadline() else {
            // Never completes; select! keeps serving the other branches.
            return std::future::pending().await;
        };

        time::sleep_until(deadline).await;

        match self.armed.take() {
            Some((_, payload)) => {
                self.stats.fired += 1;
                trace!("deferred command fired");
                payload
            }
            // Unreachable in practice: nothing else runs between the sleep
            // completing and this poll.
            None => std::future::pending().await,
        }
    }

    /// Whether a payload is pending.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// When the pending payload is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|(deadline, _)| *deadline)
    }

    /// The pending payload, without disarming.
    pub fn payload(&self) -> Option<&T> {
        self.armed.as_ref().map(|(_, payload)| payload)
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> TimerStats {
        self.stats
    }
}
