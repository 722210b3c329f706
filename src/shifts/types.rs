use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

/// Every shift runs for one hour from its due time.
pub const SHIFT_LENGTH_SECS: i64 = 3600;

/// Display name used whenever the host cannot be determined.
pub const UNKNOWN_HOST: &str = "Unknown";

const UNTITLED_SHIFT: &str = "Untitled shift";

/// A card as returned by the task board. Every field is optional because the
/// board does not guarantee any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default, rename = "idMembers")]
    pub id_members: Option<Vec<String>>,
}

/// A board member as returned by the task board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMember {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCandidate {
    pub id: String,
    pub name: String,
    pub due_at: Option<DateTime<Utc>>,
    pub host_ref: Option<String>,
}

impl ShiftCandidate {
    /// Converts a raw card, keeping it only when it is selectable and carries
    /// a parsable due date. Malformed dates are dropped, not reported.
    pub fn from_raw(card: RawCard) -> Option<Self> {
        let id = card.id.filter(|id| !id.is_empty())?;
        let due_at = card.due.as_deref().and_then(parse_due)?;
        let name = card
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNTITLED_SHIFT.to_string());
        let host_ref = card
            .id_members
            .and_then(|members| members.into_iter().find(|member| !member.is_empty()));

        Some(Self {
            id,
            name,
            due_at: Some(due_at),
            host_ref,
        })
    }

    /// `due_at + 1h`; `None` without a due date or on overflow.
    pub fn finish_at(&self) -> Option<DateTime<Utc>> {
        self.due_at?
            .checked_add_signed(TimeDelta::seconds(SHIFT_LENGTH_SECS))
    }

    pub fn formatted_due(&self) -> String {
        self.due_at.map_or_else(
            || "No due date".to_string(),
            |due| due.format("%a, %d %b %Y %H:%M UTC").to_string(),
        )
    }
}

fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|due| due.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub display_name: String,
}

impl HostInfo {
    pub fn unknown() -> Self {
        Self {
            display_name: UNKNOWN_HOST.to_string(),
        }
    }

    pub fn from_member(member: RawMember) -> Self {
        member
            .username
            .filter(|name| !name.trim().is_empty())
            .map_or_else(Self::unknown, |display_name| Self { display_name })
    }
}

impl Default for HostInfo {
    fn default() -> Self {
        Self::unknown()
    }
}
