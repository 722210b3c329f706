use chrono::{TimeZone, Utc};
use hostshift::sink::ActionRow;
use hostshift::workflow::{WorkflowOutcome, messages};

use super::workflow_harness::{
    ANNOUNCE_CHANNEL, FakeBoard, OWNER, RecordingSink, accept, dated_card, pick, refuse,
    run_with_events, twelve_cards_nine_dated,
};

#[tokio::test]
async fn fourth_dated_shift_is_announced_once() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated()).host("member-6", "alice");
    let sink = RecordingSink::new();

    // Cards 2 and 5 are undated, so the fourth offered shift is card 6.
    let outcome = run_with_events(
        &board,
        &sink,
        vec![pick(OWNER, "card-6"), accept(OWNER)],
    )
    .await;
    assert_eq!(outcome, WorkflowOutcome::Announced);

    let renders = sink.rendered();
    assert_eq!(renders.len(), 3);

    let ActionRow::Select(menu) = &renders[0].components[0] else {
        panic!("selection view must carry a select menu");
    };
    assert_eq!(menu.options.len(), 9);
    assert_eq!(menu.options[3].value, "card-6");

    assert_eq!(
        renders[1].embeds[0].title.as_deref(),
        Some("Selected Shift: Shift 6")
    );
    assert!(
        renders[2].embeds[0]
            .description
            .as_deref()
            .unwrap_or_default()
            .contains("announced successfully")
    );

    let start = Utc
        .with_ymd_and_hms(2026, 4, 6, 18, 0, 0)
        .unwrap()
        .timestamp();
    let broadcasts = sink.broadcasted();
    assert_eq!(broadcasts.len(), 1);
    let (channel, view) = &broadcasts[0];
    assert_eq!(channel, ANNOUNCE_CHANNEL);
    assert_eq!(view.content.as_deref(), Some("@everyone"));
    let body = view.embeds[0].description.clone().unwrap_or_default();
    assert!(body.contains("**Shift Name:** Shift 6"));
    assert!(body.contains("**Host:** alice"));
    assert!(body.contains(&format!("**Start:** <t:{start}:R>")));
    assert!(body.contains(&format!("**Finish:** <t:{}:R>", start + 3600)));

    assert_eq!(board.card_fetches.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(board.host_lookups.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refusal_publishes_nothing() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated()).host("member-1", "bob");
    let sink = RecordingSink::new();

    let outcome = run_with_events(
        &board,
        &sink,
        vec![pick(OWNER, "card-1"), refuse(OWNER)],
    )
    .await;

    assert_eq!(outcome, WorkflowOutcome::Refused);
    assert!(sink.broadcasted().is_empty());
    assert_eq!(sink.last_text().as_deref(), Some(messages::REFUSED));
}

#[tokio::test]
async fn failed_host_lookup_announces_unknown_host() {
    let board = FakeBoard::with_cards(vec![dated_card(3, Some("member-gone"))]);
    let sink = RecordingSink::new();

    let outcome = run_with_events(
        &board,
        &sink,
        vec![pick(OWNER, "card-3"), accept(OWNER)],
    )
    .await;

    assert_eq!(outcome, WorkflowOutcome::Announced);
    let broadcasts = sink.broadcasted();
    let body = broadcasts[0].1.embeds[0]
        .description
        .clone()
        .unwrap_or_default();
    assert!(body.contains("**Host:** Unknown"));
}

#[tokio::test]
async fn failed_announcement_is_reported_without_retry() {
    let board = FakeBoard::with_cards(twelve_cards_nine_dated());
    let sink = RecordingSink::failing_broadcast();

    let outcome = run_with_events(
        &board,
        &sink,
        vec![pick(OWNER, "card-4"), accept(OWNER)],
    )
    .await;

    assert_eq!(outcome, WorkflowOutcome::AnnouncementFailed);
    assert!(sink.broadcasted().is_empty());
    assert_eq!(
        sink.last_text().as_deref(),
        Some(messages::ANNOUNCEMENT_FAILED)
    );
    // selection, confirmation, success acknowledgement, failure notice
    assert_eq!(sink.rendered().len(), 4);
}
