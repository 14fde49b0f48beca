//! Integration tests for the deferred timer.
//!
//! Uses a paused Tokio clock so deadlines resolve deterministically: the
//! runtime auto-advances time whenever every task is waiting on a timer.

use std::time::Duration;

use cardsync_timer::DeferredTimer;
use tokio::time::{self, Instant};

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_fires_after_delay_with_payload() {
    let mut timer = DeferredTimer::new();
    let start = Instant::now();
    timer.schedule(Duration::from_secs(5), "g1");

    let payload = timer.fired().await;

    assert_eq!(payload, "g1");
    assert!(start.elapsed() >= Duration::from_secs(5));
    assert!(!timer.is_armed(), "a fired timer disarms itself");
    assert_eq!(timer.stats().fired, 1);
}

#[tokio::test(start_paused = true)]
async fn test_does_not_fire_early() {
    let mut timer = DeferredTimer::new();
    timer.schedule(Duration::from_secs(5), 7u32);

    let early = time::timeout(Duration::from_secs(4), timer.fired()).await;
    assert!(early.is_err(), "should still be pending after 4s");
    assert!(timer.is_armed(), "dropping fired() must keep the timer armed");

    let payload = time::timeout(Duration::from_secs(2), timer.fired()).await;
    assert_eq!(payload.unwrap(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_unarmed_timer_pends_forever() {
    let mut timer = DeferredTimer::<()>::new();
    let result = time::timeout(Duration::from_secs(3600), timer.fired()).await;
    assert!(result.is_err());
}

// =========================================================================
// Cancellation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_firing() {
    let mut timer = DeferredTimer::new();
    timer.schedule(Duration::from_secs(5), "g1");

    time::advance(Duration::from_secs(2)).await;
    assert_eq!(timer.cancel(), Some("g1"));

    let result = time::timeout(Duration::from_secs(60), timer.fired()).await;
    assert!(result.is_err(), "a cancelled payload must never be delivered");

    let stats = timer.stats();
    assert_eq!(stats.fired, 0);
    assert_eq!(stats.cancelled, 1);
}

#[tokio::test(start_paused = true)]
async fn test_reschedule_restarts_countdown() {
    let mut timer = DeferredTimer::new();
    let start = Instant::now();
    timer.schedule(Duration::from_secs(5), 1u8);

    time::advance(Duration::from_secs(4)).await;
    timer.schedule(Duration::from_secs(5), 2u8);

    let payload = timer.fired().await;
    assert_eq!(payload, 2);
    assert!(start.elapsed() >= Duration::from_secs(9));
}

#[tokio::test(start_paused = true)]
async fn test_select_serves_other_branch_while_armed() {
    let mut timer = DeferredTimer::new();
    timer.schedule(Duration::from_secs(5), "restart");

    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(1);
    tx.send("leave").await.unwrap();

    let first = tokio::select! {
        Some(msg) = rx.recv() => msg,
        payload = timer.fired() => payload,
    };
    assert_eq!(first, "leave");
    assert!(timer.is_armed());
}
