use hostshift::workflow::{
    ComponentEvent, Invocation, WorkflowOutcome, event_channel, handle_invocation,
};

use super::workflow_harness::{
    FakeBoard, OWNER, RecordingSink, accept, pick, refuse, run_with_events, settings,
    twelve_cards_nine_dated,
};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn other_users_cannot_pick_or_decide() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::new();

    let outcome = run_with_events(
        &board,
        &sink,
        vec![
            pick("intruder", "card-1"),
            pick(OWNER, "card-3"),
            refuse("intruder"),
            accept(OWNER),
        ],
    )
    .await;

    assert_eq!(outcome, WorkflowOutcome::Announced);
    let body = sink.broadcasted()[0].1.embeds[0]
        .description
        .clone()
        .unwrap_or_default();
    assert!(body.contains("**Shift Name:** Shift 3"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn only_foreign_events_let_the_session_expire() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::new();

    let outcome = run_with_events(
        &board,
        &sink,
        vec![pick("intruder", "card-1"), pick("intruder", "card-3")],
    )
    .await;

    assert_eq!(outcome, WorkflowOutcome::Expired);
    assert!(sink.broadcasted().is_empty());
}

#[tokio::test]
async fn parallel_invocations_stay_independent() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let first_sink = RecordingSink::new();
    let second_sink = RecordingSink::new();
    let settings = settings();

    let (first_tx, mut first_rx) = event_channel();
    let (second_tx, mut second_rx) = event_channel();
    first_tx.try_send(pick("user-a", "card-1")).unwrap();
    first_tx.try_send(accept("user-a")).unwrap();
    second_tx.try_send(pick("user-b", "card-4")).unwrap();
    second_tx
        .try_send(ComponentEvent::button("user-b", "refuseshift"))
        .unwrap();

    let (first, second) = tokio::join!(
        handle_invocation(
            Invocation {
                owner_id: "user-a",
                source: &board,
                sink: &first_sink,
                events: &mut first_rx,
            },
            &settings,
        ),
        handle_invocation(
            Invocation {
                owner_id: "user-b",
                source: &board,
                sink: &second_sink,
                events: &mut second_rx,
            },
            &settings,
        ),
    );

    assert_eq!(first, WorkflowOutcome::Announced);
    assert_eq!(second, WorkflowOutcome::Refused);
    assert_eq!(first_sink.broadcasted().len(), 1);
    assert!(second_sink.broadcasted().is_empty());
}
