#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hostshift::error::{SinkError, SourceError};
use hostshift::shifts::{HostInfo, RawCard, TaskSource};
use hostshift::sink::{MessageView, NotificationSink};
use hostshift::workflow::confirmation::{ACCEPT_CUSTOM_ID, REFUSE_CUSTOM_ID};
use hostshift::workflow::selection::SELECT_CUSTOM_ID;
use hostshift::workflow::{
    ComponentEvent, Invocation, WorkflowOutcome, WorkflowSettings, event_channel,
    handle_invocation,
};

pub const OWNER: &str = "owner-1";
pub const ANNOUNCE_CHANNEL: &str = "1332446090183577721";

pub fn settings() -> WorkflowSettings {
    WorkflowSettings {
        list_id: "list-1".into(),
        announce_channel_id: ANNOUNCE_CHANNEL.into(),
        max_shifts: 12,
        selection_timeout: Duration::from_secs(120),
        confirmation_timeout: Duration::from_secs(120),
    }
}

pub fn dated_card(index: usize, host: Option<&str>) -> RawCard {
    RawCard {
        id: Some(format!("card-{index}")),
        name: Some(format!("Shift {index}")),
        due: Some(format!("2026-04-{:02}T18:00:00.000Z", index)),
        id_members: host.map(|member| vec![member.to_string()]),
    }
}

pub fn undated_card(index: usize) -> RawCard {
    RawCard {
        id: Some(format!("card-{index}")),
        name: Some(format!("Shift {index}")),
        due: None,
        id_members: None,
    }
}

/// Twelve cards, of which 2, 5 and 9 have no due date.
pub fn twelve_cards_nine_dated() -> Vec<RawCard> {
    (1..=12)
        .map(|i| {
            if matches!(i, 2 | 5 | 9) {
                undated_card(i)
            } else {
                dated_card(i, Some(&format!("member-{i}")))
            }
        })
        .collect()
}

/// In-memory task board.
pub struct FakeBoard {
    cards: Option<Vec<RawCard>>,
    hosts: HashMap<String, String>,
    pub card_fetches: AtomicUsize,
    pub host_lookups: AtomicUsize,
}

impl FakeBoard {
    pub fn with_cards(cards: Vec<RawCard>) -> Self {
        Self {
            cards: Some(cards),
            hosts: HashMap::new(),
            card_fetches: AtomicUsize::new(0),
            host_lookups: AtomicUsize::new(0),
        }
    }

    /// A board whose card listing always fails.
    pub fn unreachable() -> Self {
        Self {
            cards: None,
            ..Self::with_cards(Vec::new())
        }
    }

    pub fn host(mut self, member_id: &str, username: &str) -> Self {
        self.hosts
            .insert(member_id.to_string(), username.to_string());
        self
    }
}

impl TaskSource for FakeBoard {
    fn name(&self) -> &str {
        "fake-board"
    }

    fn fetch_candidates<'a>(
        &'a self,
        _list_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawCard>, SourceError>> + Send + 'a>> {
        self.card_fetches.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.cards.clone().ok_or_else(|| SourceError::Request {
                resource: "fake list cards".into(),
                message: "connection refused".into(),
            })
        })
    }

    fn fetch_host<'a>(
        &'a self,
        member_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HostInfo, SourceError>> + Send + 'a>> {
        self.host_lookups.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.hosts
                .get(member_id)
                .map(|name| HostInfo {
                    display_name: name.clone(),
                })
                .ok_or_else(|| SourceError::Status {
                    resource: "fake member".into(),
                    status: 404,
                })
        })
    }
}

/// Records everything the workflow shows.
#[derive(Default)]
pub struct RecordingSink {
    pub renders: Mutex<Vec<MessageView>>,
    pub clears: AtomicUsize,
    pub broadcasts: Mutex<Vec<(String, MessageView)>>,
    failing_renders: AtomicUsize,
    fail_broadcast: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` renders fail.
    pub fn failing_first_renders(count: usize) -> Self {
        Self {
            failing_renders: AtomicUsize::new(count),
            ..Self::default()
        }
    }

    pub fn failing_broadcast() -> Self {
        Self {
            fail_broadcast: true,
            ..Self::default()
        }
    }

    pub fn rendered(&self) -> Vec<MessageView> {
        self.renders.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.renders
            .lock()
            .unwrap()
            .last()
            .and_then(|view| view.content.clone())
    }

    pub fn broadcasted(&self) -> Vec<(String, MessageView)> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl NotificationSink for RecordingSink {
    fn render<'a>(
        &'a self,
        view: &'a MessageView,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>> {
        Box::pin(async move {
            let should_fail = self
                .failing_renders
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if should_fail {
                return Err(SinkError::Render("interaction token expired".into()));
            }
            self.renders.lock().unwrap().push(view.clone());
            Ok(())
        })
    }

    fn clear_controls<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>> {
        Box::pin(async move {
            self.clears.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn broadcast<'a>(
        &'a self,
        channel_id: &'a str,
        view: &'a MessageView,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_broadcast {
                return Err(SinkError::Broadcast {
                    channel: channel_id.to_string(),
                    message: "missing access".into(),
                });
            }
            self.broadcasts
                .lock()
                .unwrap()
                .push((channel_id.to_string(), view.clone()));
            Ok(())
        })
    }
}

/// Runs one invocation by [`OWNER`] with `events` already queued. The sender
/// stays open for the whole run, so a silent session ends by its deadline.
pub async fn run_with_events(
    board: &FakeBoard,
    sink: &RecordingSink,
    events: Vec<ComponentEvent>,
) -> WorkflowOutcome {
    let (tx, mut rx) = event_channel();
    for event in events {
        tx.try_send(event).unwrap();
    }

    let outcome = handle_invocation(
        Invocation {
            owner_id: OWNER,
            source: board,
            sink,
            events: &mut rx,
        },
        &settings(),
    )
    .await;
    drop(tx);
    outcome
}

pub fn pick(user: &str, card_id: &str) -> ComponentEvent {
    ComponentEvent::select(user, SELECT_CUSTOM_ID, card_id)
}

pub fn accept(user: &str) -> ComponentEvent {
    ComponentEvent::button(user, ACCEPT_CUSTOM_ID)
}

pub fn refuse(user: &str) -> ComponentEvent {
    ComponentEvent::button(user, REFUSE_CUSTOM_ID)
}
