//! [`NotificationSink`] backed by one interaction's original response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Value, json};

use super::http_client::DiscordHttpClient;
use super::types::{ButtonStyleCode, ComponentType};
use crate::error::SinkError;
use crate::sink::{ActionRow, ButtonStyle, Embed, MessageView, NotificationSink};

pub struct DiscordSink {
    http: Arc<DiscordHttpClient>,
    application_id: String,
    interaction_token: String,
}

impl DiscordSink {
    pub fn new(
        http: Arc<DiscordHttpClient>,
        application_id: impl Into<String>,
        interaction_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            application_id: application_id.into(),
            interaction_token: interaction_token.into(),
        }
    }
}

fn button_style_code(style: ButtonStyle) -> u8 {
    let code = match style {
        ButtonStyle::Primary => ButtonStyleCode::Primary,
        ButtonStyle::Secondary => ButtonStyleCode::Secondary,
        ButtonStyle::Success => ButtonStyleCode::Success,
        ButtonStyle::Danger => ButtonStyleCode::Danger,
    };
    code as u8
}

fn embed_to_json(embed: &Embed) -> Value {
    let mut out = json!({});
    if let Some(title) = &embed.title {
        out["title"] = json!(title);
    }
    if let Some(description) = &embed.description {
        out["description"] = json!(description);
    }
    if let Some(color) = embed.color {
        out["color"] = json!(color);
    }
    if !embed.fields.is_empty() {
        out["fields"] = embed
            .fields
            .iter()
            .map(|field| json!({"name": field.name, "value": field.value, "inline": field.inline}))
            .collect();
    }
    out
}

fn row_to_json(row: &ActionRow) -> Value {
    let components: Vec<Value> = match row {
        ActionRow::Select(menu) => {
            let options: Vec<Value> = menu
                .options
                .iter()
                .map(|option| {
                    let mut out = json!({"label": option.label, "value": option.value});
                    if let Some(description) = &option.description {
                        out["description"] = json!(description);
                    }
                    out
                })
                .collect();
            let mut select = json!({
                "type": ComponentType::StringSelect as u8,
                "custom_id": menu.custom_id,
                "options": options,
            });
            if let Some(placeholder) = &menu.placeholder {
                select["placeholder"] = json!(placeholder);
            }
            vec![select]
        }
        ActionRow::Buttons(buttons) => buttons
            .iter()
            .map(|button| {
                json!({
                    "type": ComponentType::Button as u8,
                    "custom_id": button.custom_id,
                    "label": button.label,
                    "style": button_style_code(button.style),
                })
            })
            .collect(),
    };

    json!({
        "type": ComponentType::ActionRow as u8,
        "components": components,
    })
}

/// Full replacement payload for a message: missing parts are sent empty so
/// that nothing from a previous render survives.
pub fn view_to_payload(view: &MessageView) -> Value {
    json!({
        "content": view.content.as_deref().unwrap_or(""),
        "embeds": view.embeds.iter().map(embed_to_json).collect::<Vec<_>>(),
        "components": view.components.iter().map(row_to_json).collect::<Vec<_>>(),
    })
}

impl NotificationSink for DiscordSink {
    fn render<'a>(
        &'a self,
        view: &'a MessageView,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>> {
        Box::pin(async move {
            self.http
                .edit_original_interaction_response(
                    &self.application_id,
                    &self.interaction_token,
                    view_to_payload(view),
                )
                .await
                .map_err(|e| SinkError::Render(format!("{e:#}")))
        })
    }

    fn clear_controls<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>> {
        Box::pin(async move {
            self.http
                .edit_original_interaction_response(
                    &self.application_id,
                    &self.interaction_token,
                    json!({ "components": [] }),
                )
                .await
                .map_err(|e| SinkError::Clear(format!("{e:#}")))
        })
    }

    fn broadcast<'a>(
        &'a self,
        channel_id: &'a str,
        view: &'a MessageView,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>> {
        Box::pin(async move {
            let mut payload = view_to_payload(view);
            payload["allowed_mentions"] = json!({ "parse": ["everyone"] });
            self.http
                .create_message(channel_id, payload)
                .await
                .map(|_| ())
                .map_err(|e| SinkError::Broadcast {
                    channel: channel_id.to_string(),
                    message: format!("{e:#}"),
                })
        })
    }
}
