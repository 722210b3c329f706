use super::messages::COLOR_ANNOUNCEMENT;
use crate::error::SinkError;
use crate::sink::{Embed, MessageView, NotificationSink};

/// Pings everyone in the destination channel.
pub const ATTENTION_MARKER: &str = "@everyone";

/// Sends accepted shift summaries to the fixed announcement channel.
pub struct AnnouncementPublisher<'a> {
    sink: &'a dyn NotificationSink,
    channel_id: &'a str,
}

impl<'a> AnnouncementPublisher<'a> {
    pub fn new(sink: &'a dyn NotificationSink, channel_id: &'a str) -> Self {
        Self { sink, channel_id }
    }

    /// One send attempt; failures are returned, never retried.
    pub async fn publish(&self, summary_text: &str) -> Result<(), SinkError> {
        let view = announcement_view(summary_text);
        self.sink.broadcast(self.channel_id, &view).await?;
        tracing::info!("Announced shift in channel {}", self.channel_id);
        Ok(())
    }
}

pub fn announcement_view(summary_text: &str) -> MessageView {
    MessageView::embed(
        Embed::default()
            .color(COLOR_ANNOUNCEMENT)
            .description(format!(
                "The following shift will be hosted, more information is below:\n\n{summary_text}"
            )),
    )
    .with_content(ATTENTION_MARKER)
}
