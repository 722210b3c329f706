use super::types::{RawCard, ShiftCandidate};

/// Keeps the cards that carry a usable due date, in board order, capped at
/// `max_count`. Cards without one are dropped silently.
pub fn filter_shifts<I>(raw: I, max_count: usize) -> Vec<ShiftCandidate>
where
    I: IntoIterator<Item = RawCard>,
{
    raw.into_iter()
        .filter_map(ShiftCandidate::from_raw)
        .take(max_count)
        .collect()
}
