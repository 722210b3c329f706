use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Discord select menus accept at most 25 options.
pub const MAX_SELECTABLE_SHIFTS: usize = 25;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub trello: TrelloConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub application_id: String,
    /// Only accept invocations from this guild; also scopes command registration.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Fixed destination of shift announcements.
    #[serde(default)]
    pub announce_channel_id: String,
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".into()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            application_id: String::new(),
            guild_id: None,
            announce_channel_id: String::new(),
            api_base: default_discord_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrelloConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_token: String,
    /// Board list whose cards are the upcoming shifts.
    #[serde(default)]
    pub list_id: String,
    #[serde(default = "default_trello_api_base")]
    pub api_base: String,
}

fn default_trello_api_base() -> String {
    "https://api.trello.com/1".into()
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_token: String::new(),
            list_id: String::new(),
            api_base: default_trello_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_max_shifts")]
    pub max_shifts: usize,
    #[serde(default = "default_session_timeout_secs")]
    pub selection_timeout_secs: u64,
    #[serde(default = "default_session_timeout_secs")]
    pub confirmation_timeout_secs: u64,
}

fn default_max_shifts() -> usize {
    12
}

fn default_session_timeout_secs() -> u64 {
    120
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_shifts: default_max_shifts(),
            selection_timeout_secs: default_session_timeout_secs(),
            confirmation_timeout_secs: default_session_timeout_secs(),
        }
    }
}

impl WorkflowConfig {
    pub fn selection_timeout(&self) -> Duration {
        Duration::from_secs(self.selection_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

impl Config {
    /// Full validation, required before the bot connects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_trello()?;
        require("discord.bot_token", &self.discord.bot_token)?;
        require("discord.application_id", &self.discord.application_id)?;
        require(
            "discord.announce_channel_id",
            &self.discord.announce_channel_id,
        )?;
        self.validate_workflow()
    }

    /// Only what is needed to read shifts from Trello.
    pub fn validate_trello(&self) -> Result<(), ConfigError> {
        require("trello.api_key", &self.trello.api_key)?;
        require("trello.api_token", &self.trello.api_token)?;
        require("trello.list_id", &self.trello.list_id)?;
        self.validate_workflow()
    }

    fn validate_workflow(&self) -> Result<(), ConfigError> {
        let max = self.workflow.max_shifts;
        if max == 0 || max > MAX_SELECTABLE_SHIFTS {
            return Err(ConfigError::Validation(format!(
                "workflow.max_shifts must be between 1 and {MAX_SELECTABLE_SHIFTS}, got {max}"
            )));
        }
        if self.workflow.selection_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "workflow.selection_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.workflow.confirmation_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "workflow.confirmation_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must be set")));
    }
    Ok(())
}
