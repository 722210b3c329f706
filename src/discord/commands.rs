use anyhow::Result;
use serde_json::{Value, json};

use super::http_client::DiscordHttpClient;
use super::types::{EPHEMERAL_FLAG, InteractionCallbackType};

pub const HOST_SHIFT_COMMAND: &str = "host-shift";

pub fn build_commands() -> Vec<Value> {
    vec![json!({
        "name": HOST_SHIFT_COMMAND,
        "description": "Hosts a shift.",
        "type": 1
    })]
}

pub async fn register_commands(
    http: &DiscordHttpClient,
    application_id: &str,
    guild_id: Option<&str>,
) -> Result<()> {
    http.register_commands(application_id, guild_id, &build_commands())
        .await
}

pub fn is_host_shift_command(data: &Value) -> bool {
    data.get("name").and_then(Value::as_str) == Some(HOST_SHIFT_COMMAND)
}

/// Extracts `(custom_id, values)` from a component interaction's data.
pub fn parse_component(data: &Value) -> Option<(String, Vec<String>)> {
    let custom_id = data.get("custom_id")?.as_str()?.to_string();
    let values = data
        .get("values")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some((custom_id, values))
}

/// Acknowledges a slash command with a "thinking" response only the invoker
/// can see; the workflow fills it in by editing the original response.
pub async fn defer_ephemeral(
    http: &DiscordHttpClient,
    interaction_id: &str,
    interaction_token: &str,
) -> Result<()> {
    http.create_interaction_response(
        interaction_id,
        interaction_token,
        InteractionCallbackType::DeferredChannelMessageWithSource as u8,
        Some(json!({ "flags": EPHEMERAL_FLAG })),
    )
    .await
}

/// Acknowledges a component use without changing the message; the workflow
/// edits it through the original interaction.
pub async fn ack_component(
    http: &DiscordHttpClient,
    interaction_id: &str,
    interaction_token: &str,
) -> Result<()> {
    http.create_interaction_response(
        interaction_id,
        interaction_token,
        InteractionCallbackType::DeferredUpdateMessage as u8,
        None,
    )
    .await
}

/// Replies to an interaction with a short invoker-only message.
pub async fn reply_ephemeral(
    http: &DiscordHttpClient,
    interaction_id: &str,
    interaction_token: &str,
    content: &str,
) -> Result<()> {
    http.create_interaction_response(
        interaction_id,
        interaction_token,
        InteractionCallbackType::ChannelMessageWithSource as u8,
        Some(json!({ "content": content, "flags": EPHEMERAL_FLAG })),
    )
    .await
}
