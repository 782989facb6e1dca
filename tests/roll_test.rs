//! Deferred Roll Tests
//!
//! Single-flight guard and non-cancellable completion on a Tokio runtime.

#![cfg(feature = "tokio")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dice_lab::experiment::{ExperimentConfig, ExperimentSession};
use dice_lab::roll::{DiceRoller, RollTiming, SharedSession};
use dice_lab::Error;

fn shared(target: u32) -> SharedSession {
    let config = ExperimentConfig::builder().trial_target(target).build().unwrap();
    Arc::new(Mutex::new(ExperimentSession::new(config)))
}

fn quick() -> RollTiming {
    RollTiming::new(Duration::from_millis(20), Duration::from_millis(10))
}

#[tokio::test]
async fn test_second_roll_refused_while_in_flight() {
    let session = shared(10);
    let mut roller = DiceRoller::seeded(1, quick());

    let first = roller.roll(&session).unwrap();
    assert!(session.lock().unwrap().is_rolling());
    assert!(matches!(roller.roll(&session), Err(Error::RollInProgress)));

    let record = first.settled().await.unwrap();
    assert_eq!(record.index(), 1);
    assert!(roller.roll(&session).is_ok());
}

#[tokio::test]
async fn test_dropped_handle_still_appends() {
    let session = shared(10);
    let mut roller = DiceRoller::seeded(2, quick());

    drop(roller.roll(&session).unwrap());
    tokio::time::sleep(Duration::from_millis(200)).await;

    let guard = session.lock().unwrap();
    assert_eq!(guard.log().len(), 1);
    assert!(!guard.is_rolling());
}

#[tokio::test]
async fn test_sequential_rolls_reach_target() {
    let session = shared(3);
    let mut roller = DiceRoller::seeded(3, RollTiming::instant());

    for expected in 1..=3 {
        let record = roller.roll(&session).unwrap().settled().await.unwrap();
        assert_eq!(record.index(), expected);
    }
    assert!(matches!(
        roller.roll(&session),
        Err(Error::TrialTargetReached { target: 3 })
    ));
}

#[tokio::test]
async fn test_seeded_rollers_are_reproducible() {
    let a = shared(5);
    let b = shared(5);
    let mut ra = DiceRoller::seeded(77, RollTiming::instant());
    let mut rb = DiceRoller::seeded(77, RollTiming::instant());

    for _ in 0..5 {
        let x = ra.roll(&a).unwrap().settled().await.unwrap();
        let y = rb.roll(&b).unwrap().settled().await.unwrap();
        assert_eq!(x.dice_values(), y.dice_values());
    }
}
