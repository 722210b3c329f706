use std::future::Future;
use std::pin::Pin;

use super::types::{HostInfo, RawCard};
use crate::error::SourceError;

/// External task-board service supplying shift cards and host identities.
pub trait TaskSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Raw cards of one board list, in board order.
    fn fetch_candidates<'a>(
        &'a self,
        list_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawCard>, SourceError>> + Send + 'a>>;

    /// Display information for one board member.
    fn fetch_host<'a>(
        &'a self,
        member_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HostInfo, SourceError>> + Send + 'a>>;
}
