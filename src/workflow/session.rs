//! Suspend-until-event primitive shared by both interactive sessions.

use tokio::time::{Instant, sleep_until};

use super::events::{ComponentEvent, EventReceiver};

/// How a wait ended.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Wait<T> {
    Matched(T),
    TimedOut,
    /// The invocation dropped its event sender.
    Closed,
}

/// Waits for the first event from `owner_id` that `accept` maps to a value.
///
/// The deadline is fixed by the caller and is never moved: events from other
/// users, and owner events `accept` rejects, are dropped without touching it.
/// The deadline branch is polled first, so nothing queued after expiry can
/// still resolve the wait.
pub(crate) async fn wait_for_owner<T, F>(
    events: &mut EventReceiver,
    owner_id: &str,
    deadline: Instant,
    mut accept: F,
) -> Wait<T>
where
    F: FnMut(&ComponentEvent) -> Option<T>,
{
    let timer = sleep_until(deadline);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            biased;
            () = &mut timer => return Wait::TimedOut,
            event = events.recv() => {
                let Some(event) = event else {
                    return Wait::Closed;
                };
                if event.user_id != owner_id {
                    tracing::debug!(
                        "Ignoring {} from non-owner {} (owner {owner_id})",
                        event.custom_id,
                        event.user_id
                    );
                    continue;
                }
                match accept(&event) {
                    Some(value) => return Wait::Matched(value),
                    None => {
                        tracing::debug!("Ignoring unrelated control {}", event.custom_id);
                    }
                }
            }
        }
    }
}
