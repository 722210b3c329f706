use super::Config;

impl Config {
    /// Secrets and deployment-specific ids may come from the environment
    /// instead of the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("HOSTSHIFT_DISCORD_TOKEN")
            .or_else(|_| std::env::var("DISCORD_TOKEN"))
            && !token.is_empty()
        {
            self.discord.bot_token = token;
        }

        if let Ok(app_id) = std::env::var("HOSTSHIFT_DISCORD_APPLICATION_ID")
            && !app_id.is_empty()
        {
            self.discord.application_id = app_id;
        }

        if let Ok(channel) = std::env::var("HOSTSHIFT_ANNOUNCE_CHANNEL")
            && !channel.is_empty()
        {
            self.discord.announce_channel_id = channel;
        }

        if let Ok(key) = std::env::var("HOSTSHIFT_TRELLO_KEY")
            && !key.is_empty()
        {
            self.trello.api_key = key;
        }

        if let Ok(token) = std::env::var("HOSTSHIFT_TRELLO_TOKEN")
            && !token.is_empty()
        {
            self.trello.api_token = token;
        }

        if let Ok(list_id) = std::env::var("HOSTSHIFT_TRELLO_LIST")
            && !list_id.is_empty()
        {
            self.trello.list_id = list_id;
        }

        if let Ok(max_str) = std::env::var("HOSTSHIFT_MAX_SHIFTS")
            && let Ok(max) = max_str.parse::<usize>()
        {
            self.workflow.max_shifts = max;
        }
    }
}
