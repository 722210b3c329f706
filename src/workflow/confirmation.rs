use std::time::Duration;

use tokio::time::Instant;

use super::events::{ComponentEvent, EventReceiver};
use super::messages::COLOR_INFO;
use super::session::{Wait, wait_for_owner};
use crate::shifts::{HostInfo, ShiftCandidate, TaskSource};
use crate::sink::{ActionRow, Button, ButtonStyle, Embed, MessageView};

pub const ACCEPT_CUSTOM_ID: &str = "acceptshift";
pub const REFUSE_CUSTOM_ID: &str = "refuseshift";

/// How a confirmation session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Carries the summary to announce.
    Accepted(String),
    Refused,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Accept,
    Refuse,
}

/// An open accept/refuse prompt for one chosen shift.
#[derive(Debug)]
pub struct ConfirmationSession {
    owner_id: String,
    chosen: ShiftCandidate,
    summary_text: String,
    deadline: Instant,
}

impl ConfirmationSession {
    /// Looks up the host, composes the summary and opens the session. The
    /// deadline starts once the summary is ready.
    pub async fn present(
        owner_id: impl Into<String>,
        chosen: ShiftCandidate,
        source: &dyn TaskSource,
        timeout: Duration,
    ) -> (Self, MessageView) {
        let host = lookup_host(source, chosen.host_ref.as_deref()).await;
        let summary_text = compose_summary(&chosen, &host);
        let view = confirmation_view(&chosen, &summary_text);
        let session = Self {
            owner_id: owner_id.into(),
            chosen,
            summary_text,
            deadline: Instant::now() + timeout,
        };
        (session, view)
    }

    pub fn chosen(&self) -> &ShiftCandidate {
        &self.chosen
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub async fn await_decision(self, events: &mut EventReceiver) -> Decision {
        let Self {
            owner_id,
            chosen,
            summary_text,
            deadline,
        } = self;

        match wait_for_owner(events, &owner_id, deadline, pressed).await {
            Wait::Matched(Choice::Accept) => {
                tracing::info!("{owner_id} accepted shift {}", chosen.id);
                Decision::Accepted(summary_text)
            }
            Wait::Matched(Choice::Refuse) => {
                tracing::info!("{owner_id} refused shift {}", chosen.id);
                Decision::Refused
            }
            Wait::TimedOut | Wait::Closed => {
                tracing::info!("Confirmation of shift {} for {owner_id} expired", chosen.id);
                Decision::Expired
            }
        }
    }
}

fn pressed(event: &ComponentEvent) -> Option<Choice> {
    match event.custom_id.as_str() {
        ACCEPT_CUSTOM_ID => Some(Choice::Accept),
        REFUSE_CUSTOM_ID => Some(Choice::Refuse),
        _ => None,
    }
}

/// Best-effort host lookup; any failure degrades to the unknown host.
pub async fn lookup_host(source: &dyn TaskSource, host_ref: Option<&str>) -> HostInfo {
    let Some(member_id) = host_ref else {
        return HostInfo::unknown();
    };
    match source.fetch_host(member_id).await {
        Ok(host) => host,
        Err(e) => {
            tracing::warn!("{}: host lookup for {member_id} failed: {e}", source.name());
            HostInfo::unknown()
        }
    }
}

/// Shift summary shown to the invoker and reused verbatim in the announcement.
pub fn compose_summary(shift: &ShiftCandidate, host: &HostInfo) -> String {
    let mut summary = format!(
        "**Shift Name:** {}\n**Host:** {}\n",
        shift.name, host.display_name
    );
    match (shift.due_at, shift.finish_at()) {
        (Some(start), Some(finish)) => {
            summary.push_str(&format!(
                "**Start:** <t:{}:R>\n**Finish:** <t:{}:R>",
                start.timestamp(),
                finish.timestamp()
            ));
        }
        _ => summary.push_str("**Start/Finish:** Time data unavailable"),
    }
    summary
}

fn confirmation_view(shift: &ShiftCandidate, summary: &str) -> MessageView {
    MessageView::embed(
        Embed::default()
            .title(format!("Selected Shift: {}", shift.name))
            .description(format!(
                "**Do you wish to announce the following shift?**\n\n{summary}"
            ))
            .color(COLOR_INFO),
    )
    .with_row(ActionRow::Buttons(vec![
        Button {
            custom_id: ACCEPT_CUSTOM_ID.to_string(),
            label: "Accept".to_string(),
            style: ButtonStyle::Success,
        },
        Button {
            custom_id: REFUSE_CUSTOM_ID.to_string(),
            label: "Refuse".to_string(),
            style: ButtonStyle::Danger,
        },
    ]))
}
