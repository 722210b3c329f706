//! Routes component interactions to the invocation that rendered them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::error::TrySendError;

use crate::workflow::{ComponentEvent, EventReceiver, EventSender, event_channel};

struct Route {
    owner_id: String,
    events: EventSender,
}

#[derive(Default)]
struct Routes {
    /// Keyed by the id of the slash-command interaction.
    by_origin: HashMap<String, Route>,
}

impl Routes {
    fn owner_is_busy(&self, owner_id: &str) -> bool {
        self.by_origin
            .values()
            .any(|route| route.owner_id == owner_id)
    }
}

/// Live invocations, at most one per user.
#[derive(Clone, Default)]
pub struct InvocationRouter {
    routes: Arc<Mutex<Routes>>,
}

/// Keeps a route registered; dropping it unregisters the route.
pub struct RouteGuard {
    routes: Arc<Mutex<Routes>>,
    origin_id: String,
}

impl Drop for RouteGuard {
    fn drop(&mut self) {
        lock(&self.routes).by_origin.remove(&self.origin_id);
    }
}

fn lock(routes: &Mutex<Routes>) -> MutexGuard<'_, Routes> {
    routes.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InvocationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an invocation opened by `owner_id` through the slash-command
    /// interaction `origin_id`. Returns `None` while the same user still has
    /// one running.
    pub fn open(&self, owner_id: &str, origin_id: &str) -> Option<(RouteGuard, EventReceiver)> {
        let mut routes = lock(&self.routes);
        if routes.owner_is_busy(owner_id) || routes.by_origin.contains_key(origin_id) {
            return None;
        }

        let (events, receiver) = event_channel();
        routes.by_origin.insert(
            origin_id.to_string(),
            Route {
                owner_id: owner_id.to_string(),
                events,
            },
        );

        let guard = RouteGuard {
            routes: Arc::clone(&self.routes),
            origin_id: origin_id.to_string(),
        };
        Some((guard, receiver))
    }

    /// Hands `event` to the invocation behind `origin_id`. Returns whether it
    /// was queued; events for finished invocations are dropped.
    pub fn dispatch(&self, origin_id: &str, event: ComponentEvent) -> bool {
        let routes = lock(&self.routes);
        let Some(route) = routes.by_origin.get(origin_id) else {
            tracing::debug!("No open invocation for interaction {origin_id}");
            return false;
        };
        if event.user_id != route.owner_id {
            tracing::debug!(
                "Dropping event from {} for interaction {origin_id} owned by {}",
                event.user_id,
                route.owner_id
            );
            return false;
        }

        match route.events.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Event queue for interaction {origin_id} is full; dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn active_count(&self) -> usize {
        lock(&self.routes).by_origin.len()
    }
}
