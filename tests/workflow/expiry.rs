use std::time::Duration;

use hostshift::workflow::{WorkflowOutcome, messages};
use tokio::time::Instant;

use super::workflow_harness::{
    FakeBoard, OWNER, RecordingSink, pick, run_with_events, twelve_cards_nine_dated,
};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn silent_selection_expires_after_two_minutes() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::new();
    let started = Instant::now();

    let outcome = run_with_events(&board, &sink, Vec::new()).await;

    assert_eq!(outcome, WorkflowOutcome::Expired);
    assert!(started.elapsed() >= Duration::from_secs(120));
    assert!(started.elapsed() < Duration::from_secs(121));
    assert_eq!(sink.clear_count(), 1);
    assert_eq!(sink.last_text().as_deref(), Some(messages::EXPIRED));
    // selection view, then the expiry notice; no confirmation was shown
    assert_eq!(sink.rendered().len(), 2);
    assert_eq!(
        board.host_lookups.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn silent_confirmation_expires_without_announcing() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::new();

    let outcome = run_with_events(&board, &sink, vec![pick(OWNER, "card-1")]).await;

    assert_eq!(outcome, WorkflowOutcome::Expired);
    assert_eq!(sink.clear_count(), 1);
    assert!(sink.broadcasted().is_empty());
    assert_eq!(sink.last_text().as_deref(), Some(messages::EXPIRED));
}
