//! The `/host-shift` flow: fetch, select, confirm, announce.
//!
//! Each invocation runs as one task that owns its sessions outright. Events
//! reach it through its own [`EventReceiver`]; nothing here is shared with
//! other invocations.

pub mod announce;
pub mod confirmation;
pub mod events;
pub mod messages;
pub mod selection;
mod session;

use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::shifts::{TaskSource, filter_shifts};
use crate::sink::{MessageView, NotificationSink};

pub use announce::AnnouncementPublisher;
pub use confirmation::{ConfirmationSession, Decision};
pub use events::{ComponentEvent, EventReceiver, EventSender, event_channel};
pub use selection::{SelectionOutcome, SelectionSession};

/// Terminal result of one invocation. Exactly one is produced per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// No card on the list had a usable due date.
    NothingAvailable,
    /// The task board could not be read.
    SourceUnavailable,
    InvalidSelection,
    Announced,
    /// Accepted, but the announcement could not be sent.
    AnnouncementFailed,
    Refused,
    Expired,
    /// Anything unexpected; the invoker saw the generic error message.
    Failed,
}

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub list_id: String,
    pub announce_channel_id: String,
    pub max_shifts: usize,
    pub selection_timeout: Duration,
    pub confirmation_timeout: Duration,
}

impl WorkflowSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            list_id: config.trello.list_id.clone(),
            announce_channel_id: config.discord.announce_channel_id.clone(),
            max_shifts: config.workflow.max_shifts,
            selection_timeout: config.workflow.selection_timeout(),
            confirmation_timeout: config.workflow.confirmation_timeout(),
        }
    }
}

/// The collaborators of one invocation.
pub struct Invocation<'a> {
    pub owner_id: &'a str,
    pub source: &'a dyn TaskSource,
    pub sink: &'a dyn NotificationSink,
    pub events: &'a mut EventReceiver,
}

/// Runs the flow and absorbs unexpected failures: the invoker is shown the
/// generic error message and the outcome is [`WorkflowOutcome::Failed`].
pub async fn handle_invocation(
    invocation: Invocation<'_>,
    settings: &WorkflowSettings,
) -> WorkflowOutcome {
    let sink = invocation.sink;
    let owner = invocation.owner_id.to_string();

    match run_host_shift(invocation, settings).await {
        Ok(outcome) => {
            tracing::info!("host-shift for {owner} finished: {outcome:?}");
            outcome
        }
        Err(e) => {
            tracing::error!("host-shift for {owner} failed: {e}");
            if let Err(render_err) = sink.render(&MessageView::text(messages::GENERIC_ERROR)).await
            {
                tracing::warn!("Could not report failure to {owner}: {render_err}");
            }
            WorkflowOutcome::Failed
        }
    }
}

/// Runs the flow, propagating failures of the sink itself.
pub async fn run_host_shift(
    invocation: Invocation<'_>,
    settings: &WorkflowSettings,
) -> Result<WorkflowOutcome> {
    let Invocation {
        owner_id,
        source,
        sink,
        events,
    } = invocation;

    let raw = match source.fetch_candidates(&settings.list_id).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("{}: fetching shifts failed: {e}", source.name());
            sink.render(&MessageView::text(messages::GENERIC_ERROR))
                .await?;
            return Ok(WorkflowOutcome::SourceUnavailable);
        }
    };

    let shifts = filter_shifts(raw, settings.max_shifts);
    if shifts.is_empty() {
        sink.render(&MessageView::text(messages::NOTHING_AVAILABLE))
            .await?;
        return Ok(WorkflowOutcome::NothingAvailable);
    }

    let (selection, view) = SelectionSession::present(owner_id, shifts, settings.selection_timeout);
    sink.render(&view).await?;

    let chosen = match selection.await_choice(events).await {
        SelectionOutcome::Resolved(shift) => shift,
        SelectionOutcome::Invalid(_) => {
            sink.render(&MessageView::text(messages::INVALID_SELECTION))
                .await?;
            return Ok(WorkflowOutcome::InvalidSelection);
        }
        SelectionOutcome::Expired => return expire(sink).await,
    };

    let (confirmation, view) =
        ConfirmationSession::present(owner_id, chosen, source, settings.confirmation_timeout)
            .await;
    sink.render(&view).await?;

    match confirmation.await_decision(events).await {
        Decision::Accepted(summary) => {
            sink.render(&messages::accepted_view()).await?;
            let publisher = AnnouncementPublisher::new(sink, &settings.announce_channel_id);
            match publisher.publish(&summary).await {
                Ok(()) => Ok(WorkflowOutcome::Announced),
                Err(e) => {
                    tracing::warn!("Shift announcement failed: {e}");
                    sink.render(&MessageView::text(messages::ANNOUNCEMENT_FAILED))
                        .await?;
                    Ok(WorkflowOutcome::AnnouncementFailed)
                }
            }
        }
        Decision::Refused => {
            sink.render(&MessageView::text(messages::REFUSED)).await?;
            Ok(WorkflowOutcome::Refused)
        }
        Decision::Expired => expire(sink).await,
    }
}

async fn expire(sink: &dyn NotificationSink) -> Result<WorkflowOutcome> {
    if let Err(e) = sink.clear_controls().await {
        tracing::debug!("Clearing expired controls failed: {e}");
    }
    sink.render(&MessageView::text(messages::EXPIRED)).await?;
    Ok(WorkflowOutcome::Expired)
}
