//! Integration tests for the ProgressTracker phase machine
//!
//! These tests verify that the tracker:
//! - Emits change events on mutations
//! - Supports multiple subscribers
//! - Rejects illegal phase transitions
//! - Keeps the one-build-per-tracker guarantee under concurrency

use std::sync::Arc;
use storypack::models::ExportPhase;
use storypack::{ProgressTracker, StateChange};
use tokio::time::{Duration, timeout};

#[tokio::test]
async fn test_phase_events_follow_build_order() {
    let tracker = Arc::new(ProgressTracker::new());
    let mut rx = tracker.subscribe();

    tracker.try_begin();
    tracker.begin_processing(2);
    tracker.record_item("001_opening.png");
    tracker.record_item("002_finale.png");
    tracker.begin_compressing();
    tracker.complete(2);

    let mut phases = Vec::new();
    while let Ok(Ok(event)) = timeout(Duration::from_millis(100), rx.recv()).await {
        if let StateChange::PhaseChanged { phase } = event {
            phases.push(phase);
        }
        if phases.last() == Some(&ExportPhase::Complete) {
            break;
        }
    }

    assert_eq!(
        phases,
        vec![
            ExportPhase::Preparing,
            ExportPhase::Processing,
            ExportPhase::Compressing,
            ExportPhase::Complete,
        ]
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let tracker = Arc::new(ProgressTracker::new());
    let mut rx1 = tracker.subscribe();
    let mut rx2 = tracker.subscribe();
    let mut rx3 = tracker.subscribe();

    tracker.try_begin();

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout waiting for event")
            .expect("Channel closed");
        assert!(matches!(
            event,
            StateChange::PhaseChanged {
                phase: ExportPhase::Preparing
            }
        ));
    }
}

#[tokio::test]
async fn test_progress_events_carry_current_file() {
    let tracker = Arc::new(ProgressTracker::new());
    tracker.try_begin();
    tracker.begin_processing(3);

    let mut rx = tracker.subscribe();
    tracker.record_item("002_chase.1.png");

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");

    match event {
        StateChange::ProgressUpdated {
            current,
            total,
            current_file,
        } => {
            assert_eq!(current, 1);
            assert_eq!(total, 3);
            assert_eq!(current_file.as_deref(), Some("002_chase.1.png"));
        }
        other => panic!("Expected ProgressUpdated, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_compression_progress_is_a_distinct_signal() {
    let tracker = Arc::new(ProgressTracker::new());
    tracker.try_begin();
    tracker.begin_processing(1);
    tracker.record_item("001_opening.png");
    tracker.begin_compressing();

    let mut rx = tracker.subscribe();
    tracker.set_compression_progress(55);

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");

    assert_eq!(event, StateChange::CompressionProgress { percent: 55 });

    // Item progress is untouched by the stream callback.
    let state = tracker.snapshot();
    assert_eq!(state.current, 1);
    assert_eq!(state.compression_percent, 55);
}

#[tokio::test]
async fn test_failure_event_from_any_phase() {
    let tracker = Arc::new(ProgressTracker::new());
    let mut rx = tracker.subscribe();

    tracker.try_begin();
    tracker.begin_processing(10);
    tracker.fail("zip stream broke");

    let mut saw_failure = false;
    while let Ok(Ok(event)) = timeout(Duration::from_millis(100), rx.recv()).await {
        if let StateChange::ExportFailed { message } = &event {
            assert_eq!(message, "zip stream broke");
            saw_failure = true;
            break;
        }
    }
    assert!(saw_failure);
    assert_eq!(tracker.snapshot().phase, ExportPhase::Error);
}

#[tokio::test]
async fn test_terminal_error_allows_retry_after_reset() {
    let tracker = Arc::new(ProgressTracker::new());

    tracker.try_begin();
    tracker.fail("first attempt");
    assert!(!tracker.snapshot().in_progress);

    // The host resets after its delayed notification, then retries.
    tracker.reset();
    assert!(tracker.try_begin());
    assert!(tracker.begin_processing(1));
}

#[tokio::test]
async fn test_only_one_build_claims_the_tracker() {
    let tracker = Arc::new(ProgressTracker::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let tracker = Arc::clone(&tracker);
        handles.push(tokio::spawn(async move { tracker.try_begin() }));
    }

    let mut claimed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            claimed += 1;
        }
    }
    assert_eq!(claimed, 1);
}

#[tokio::test]
async fn test_illegal_jump_leaves_state_intact() {
    let tracker = Arc::new(ProgressTracker::new());
    tracker.try_begin();

    assert!(!tracker.begin_compressing());
    assert!(!tracker.complete(5));

    let state = tracker.snapshot();
    assert_eq!(state.phase, ExportPhase::Preparing);
    assert_eq!(state.files_written, 0);
}
