//! Shift records and the task-board service they come from.

pub mod filter;
pub mod source;
pub mod trello;
pub mod types;

pub use filter::filter_shifts;
pub use source::TaskSource;
pub use trello::TrelloClient;
pub use types::{HostInfo, RawCard, RawMember, SHIFT_LENGTH_SECS, ShiftCandidate, UNKNOWN_HOST};
