use hostshift::workflow::{WorkflowOutcome, messages};

use super::workflow_harness::{
    FakeBoard, OWNER, RecordingSink, pick, run_with_events, twelve_cards_nine_dated, undated_card,
};

#[tokio::test]
async fn unreachable_board_shows_generic_error() {
    let board = FakeBoard::unreachable();
    let sink = RecordingSink::new();

    let outcome = run_with_events(&board, &sink, Vec::new()).await;

    assert_eq!(outcome, WorkflowOutcome::SourceUnavailable);
    assert_eq!(sink.rendered().len(), 1);
    assert_eq!(sink.last_text().as_deref(), Some(messages::GENERIC_ERROR));
}

#[tokio::test]
async fn list_without_due_dates_opens_no_session() {
    let board = FakeBoard::with_cards((1..=4).map(undated_card).collect());
    let sink = RecordingSink::new();

    let outcome = run_with_events(&board, &sink, vec![pick(OWNER, "card-1")]).await;

    assert_eq!(outcome, WorkflowOutcome::NothingAvailable);
    let renders = sink.rendered();
    assert_eq!(renders.len(), 1);
    assert!(!renders[0].has_controls());
    assert_eq!(
        renders[0].content.as_deref(),
        Some(messages::NOTHING_AVAILABLE)
    );
}

#[tokio::test]
async fn unknown_card_id_is_an_invalid_selection() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::new();

    // card-2 exists on the board but has no due date, so it was never offered.
    let outcome = run_with_events(&board, &sink, vec![pick(OWNER, "card-2")]).await;

    assert_eq!(outcome, WorkflowOutcome::InvalidSelection);
    assert_eq!(sink.rendered().len(), 2);
    assert_eq!(
        sink.last_text().as_deref(),
        Some(messages::INVALID_SELECTION)
    );
    assert!(sink.broadcasted().is_empty());
    assert_eq!(
        board.host_lookups.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn failing_sink_ends_in_generic_error() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::failing_first_renders(1);

    let outcome = run_with_events(&board, &sink, Vec::new()).await;

    assert_eq!(outcome, WorkflowOutcome::Failed);
    assert_eq!(sink.rendered().len(), 1);
    assert_eq!(sink.last_text().as_deref(), Some(messages::GENERIC_ERROR));
}
