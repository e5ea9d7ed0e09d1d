//! StreamSession state machine unit tests

use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::json;
use std::sync::Arc;

use pulse_gateway::{
    session::{FrameOutcome, StreamSession},
    store::MemoryStore,
};

use super::helpers::*;

fn session_with_store(store: MemoryStore) -> StreamSession {
    crate::init_test_env();
    let config = crate::create_test_config();
    StreamSession::new(
        Arc::new(store),
        sample_table(),
        config.aggregation,
        None,
    )
}

fn empty_session() -> StreamSession {
    session_with_store(MemoryStore::new().with_assets(sample_assets()))
}

#[rstest]
#[tokio::test]
async fn test_valid_frame_emits_snapshot_over_the_new_window() {
    let store = MemoryStore::new()
        .with_assets(sample_assets())
        .with_aggregates(vec![point(1, 0.8, "2025-04-21T15:07:00Z")]);
    let mut session = session_with_store(store);

    let frame = json!({
        "start_time": "2025-04-21T15:00:00Z",
        "end_time": "2025-04-21T15:10:00Z"
    });
    let outcome = session.handle_frame(&frame.to_string()).await;

    let FrameOutcome::Snapshot(timeline) = outcome else {
        panic!("expected a snapshot");
    };
    // Boundaries 15:00, 15:05, 15:10
    assert_eq!(timeline.len(), 3);
    // No filter: every known code, lexicographically sorted
    let keys: Vec<&str> = timeline[0].coins.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["BTC", "DOGE", "ETH"]);
    assert_eq!(timeline[1].coins["BTC"], 0.8);

    assert_eq!(session.window().start, ts("2025-04-21T15:00:00Z"));
    assert_eq!(session.window().end, ts("2025-04-21T15:10:00Z"));
}

#[rstest]
#[tokio::test]
async fn test_inverted_window_is_rejected_and_state_is_kept() {
    let mut session = empty_session();
    let before = session.window();

    let frame = json!({
        "start_time": "2025-04-21T16:00:00Z",
        "end_time": "2025-04-21T15:00:00Z"
    });
    let outcome = session.handle_frame(&frame.to_string()).await;

    assert!(matches!(outcome, FrameOutcome::Reject(_)));
    assert_eq!(session.window(), before);

    // The session is still active: a later valid frame aggregates over
    // its own window, not the rejected one
    let frame = json!({
        "start_time": "2025-04-21T15:00:00Z",
        "end_time": "2025-04-21T15:05:00Z"
    });
    let outcome = session.handle_frame(&frame.to_string()).await;
    let FrameOutcome::Snapshot(timeline) = outcome else {
        panic!("expected a snapshot after a rejected frame");
    };
    assert_eq!(timeline[0].time, "2025-04-21T15:00Z");
}

#[rstest]
#[case(json!({"start_time": "not a timestamp", "end_time": "2025-04-21T15:00:00Z"}))]
#[case(json!({"end_time": "2025-04-21T15:00:00Z"}))]
#[case(json!({}))]
#[tokio::test]
async fn test_unparseable_window_rejects_without_closing(#[case] frame: serde_json::Value) {
    let mut session = empty_session();
    let before = session.window();

    let outcome = session.handle_frame(&frame.to_string()).await;

    assert!(matches!(outcome, FrameOutcome::Reject(_)));
    assert_eq!(session.window(), before);
}

#[rstest]
#[tokio::test]
async fn test_malformed_payload_closes_the_session() {
    let mut session = empty_session();

    let outcome = session.handle_frame("{ not json at all").await;

    assert!(matches!(outcome, FrameOutcome::Close));
}

#[rstest]
#[tokio::test]
async fn test_filter_sticks_across_frames_without_tokens() {
    let mut session = empty_session();

    let first = json!({
        "start_time": "2025-04-21T15:00:00Z",
        "end_time": "2025-04-21T15:10:00Z",
        "tokens": ["BTC"]
    });
    let FrameOutcome::Snapshot(timeline) = session.handle_frame(&first.to_string()).await
    else {
        panic!("expected a snapshot");
    };
    let keys: Vec<&str> = timeline[0].coins.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["BTC"]);

    // New window, no tokens field: the filter is left untouched
    let second = json!({
        "start_time": "2025-04-21T16:00:00Z",
        "end_time": "2025-04-21T16:10:00Z"
    });
    let FrameOutcome::Snapshot(timeline) = session.handle_frame(&second.to_string()).await
    else {
        panic!("expected a snapshot");
    };
    let keys: Vec<&str> = timeline[0].coins.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["BTC"]);
    assert_eq!(session.filter(), Some(&["BTC".to_string()][..]));
}

#[rstest]
#[tokio::test]
async fn test_empty_tokens_list_activates_an_empty_filter() {
    let mut session = empty_session();

    let frame = json!({
        "start_time": "2025-04-21T15:00:00Z",
        "end_time": "2025-04-21T15:05:00Z",
        "tokens": []
    });
    let FrameOutcome::Snapshot(timeline) = session.handle_frame(&frame.to_string()).await
    else {
        panic!("expected a snapshot");
    };

    assert!(timeline.iter().all(|bucket| bucket.coins.is_empty()));
    assert_eq!(session.filter(), Some(&[][..]));
}

#[rstest]
#[tokio::test]
async fn test_initial_filter_from_connection_applies_to_first_snapshot() {
    let store = MemoryStore::new().with_assets(sample_assets());
    let config = crate::create_test_config();
    let mut session = StreamSession::new(
        Arc::new(store),
        sample_table(),
        config.aggregation,
        Some(vec!["ETH".to_string()]),
    );

    let frame = json!({
        "start_time": "2025-04-21T15:00:00Z",
        "end_time": "2025-04-21T15:05:00Z"
    });
    let FrameOutcome::Snapshot(timeline) = session.handle_frame(&frame.to_string()).await
    else {
        panic!("expected a snapshot");
    };
    let keys: Vec<&str> = timeline[0].coins.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["ETH"]);
}

#[rstest]
#[tokio::test]
async fn test_fetch_failure_notifies_and_stays_active() {
    let mut session =
        session_with_store(MemoryStore::new().with_assets(sample_assets()).failing());

    let frame = json!({
        "start_time": "2025-04-21T15:00:00Z",
        "end_time": "2025-04-21T15:05:00Z"
    });
    let outcome = session.handle_frame(&frame.to_string()).await;
    assert!(matches!(outcome, FrameOutcome::Reject(_)));

    // The window update itself succeeded; only the fetch failed
    assert_eq!(session.window().start, ts("2025-04-21T15:00:00Z"));

    // And the session keeps accepting frames
    let outcome = session.handle_frame(&frame.to_string()).await;
    assert!(matches!(outcome, FrameOutcome::Reject(_)));
}

#[rstest]
#[tokio::test]
async fn test_default_window_is_the_most_recent_hour() {
    let session = empty_session();
    let window = session.window();

    let length = window.end - window.start;
    assert_eq!(length.num_seconds(), 3600);
    assert!(session.filter().is_none());
}
