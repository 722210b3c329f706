use std::time::Duration;

use tokio::time::Instant;

use super::events::{ComponentEvent, EventReceiver};
use super::messages::COLOR_INFO;
use super::session::{Wait, wait_for_owner};
use crate::shifts::ShiftCandidate;
use crate::sink::{ActionRow, Embed, MessageView, SelectMenu, SelectOption};

pub const SELECT_CUSTOM_ID: &str = "shift_select";

/// How a selection session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Resolved(ShiftCandidate),
    /// The owner submitted an id that is not one of the presented shifts.
    Invalid(String),
    Expired,
}

/// An open single-choice prompt over the filtered shifts.
///
/// Resolving consumes the session, so each one resolves at most once.
#[derive(Debug)]
pub struct SelectionSession {
    owner_id: String,
    candidates: Vec<ShiftCandidate>,
    deadline: Instant,
}

impl SelectionSession {
    /// Opens the session and returns it with the view to show the owner.
    /// The deadline starts now.
    pub fn present(
        owner_id: impl Into<String>,
        candidates: Vec<ShiftCandidate>,
        timeout: Duration,
    ) -> (Self, MessageView) {
        let view = selection_view(&candidates);
        let session = Self {
            owner_id: owner_id.into(),
            candidates,
            deadline: Instant::now() + timeout,
        };
        (session, view)
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn candidates(&self) -> &[ShiftCandidate] {
        &self.candidates
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub async fn await_choice(self, events: &mut EventReceiver) -> SelectionOutcome {
        let Self {
            owner_id,
            candidates,
            deadline,
        } = self;

        let submitted = wait_for_owner(events, &owner_id, deadline, submitted_value).await;
        match submitted {
            Wait::Matched(value) => resolve(candidates, value),
            Wait::TimedOut => {
                tracing::info!("Shift selection for {owner_id} expired");
                SelectionOutcome::Expired
            }
            Wait::Closed => {
                tracing::debug!("Shift selection for {owner_id} closed before a choice");
                SelectionOutcome::Expired
            }
        }
    }
}

fn submitted_value(event: &ComponentEvent) -> Option<String> {
    (event.custom_id == SELECT_CUSTOM_ID).then(|| event.values.first().cloned().unwrap_or_default())
}

fn resolve(candidates: Vec<ShiftCandidate>, value: String) -> SelectionOutcome {
    match candidates.into_iter().find(|shift| shift.id == value) {
        Some(shift) => SelectionOutcome::Resolved(shift),
        None => {
            tracing::warn!("Shift selection referenced unknown id {value:?}");
            SelectionOutcome::Invalid(value)
        }
    }
}

fn selection_view(candidates: &[ShiftCandidate]) -> MessageView {
    let mut embed = Embed::default()
        .title("Upcoming Shifts")
        .description("Here are the upcoming shifts!")
        .color(COLOR_INFO);
    let mut options = Vec::with_capacity(candidates.len());

    for shift in candidates {
        let when = shift.formatted_due();
        embed = embed.field(&shift.name, &when);
        options.push(SelectOption::new(&shift.name, Some(when.as_str()), &shift.id));
    }

    MessageView::embed(embed).with_row(ActionRow::Select(SelectMenu {
        custom_id: SELECT_CUSTOM_ID.to_string(),
        placeholder: Some("Select a shift!".to_string()),
        options,
    }))
}
