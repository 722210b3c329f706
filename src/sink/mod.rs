pub mod view;

use std::future::Future;
use std::pin::Pin;

use crate::error::SinkError;

pub use view::{
    ActionRow, Button, ButtonStyle, Embed, EmbedField, MessageView, SelectMenu, SelectOption,
};

/// Where the workflow shows things: the invoker-only response of one
/// invocation, plus a broadcast path to public channels.
pub trait NotificationSink: Send + Sync {
    /// Replace the invoker-only response with `view` (text, embeds and
    /// controls are all replaced).
    fn render<'a>(
        &'a self,
        view: &'a MessageView,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>>;

    /// Remove interactive controls from the invoker-only response, leaving
    /// its text in place. Clearing an already cleared response is a no-op.
    fn clear_controls<'a>(&'a self)
    -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>>;

    /// Send a persistent message to a public channel.
    fn broadcast<'a>(
        &'a self,
        channel_id: &'a str,
        view: &'a MessageView,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>>;
}
