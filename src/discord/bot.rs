use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;

use super::commands::{
    ack_component, defer_ephemeral, is_host_shift_command, parse_component, reply_ephemeral,
};
use super::gateway::{DiscordGateway, GatewayEvent, GatewaySession, Interaction};
use super::http_client::DiscordHttpClient;
use super::router::InvocationRouter;
use super::sink::DiscordSink;
use super::types::{DEFAULT_INTENTS, InteractionType};
use crate::config::{Config, DiscordConfig};
use crate::error::TransportError;
use crate::shifts::{TaskSource, TrelloClient};
use crate::workflow::{
    ComponentEvent, Invocation, WorkflowSettings, handle_invocation, messages,
};

const INITIAL_BACKOFF_SECS: u64 = 1;
const MAX_BACKOFF_SECS: u64 = 60;
const GATEWAY_EVENT_BUFFER: usize = 100;

/// Serves `/host-shift` over the Discord gateway.
pub struct HostShiftBot {
    http: Arc<DiscordHttpClient>,
    source: Arc<dyn TaskSource>,
    router: InvocationRouter,
    settings: Arc<WorkflowSettings>,
    discord: DiscordConfig,
    session: Arc<GatewaySession>,
}

impl HostShiftBot {
    pub fn new(config: &Config) -> Self {
        Self::with_source(config, Arc::new(TrelloClient::new(&config.trello)))
    }

    pub fn with_source(config: &Config, source: Arc<dyn TaskSource>) -> Self {
        Self {
            http: Arc::new(DiscordHttpClient::new(
                &config.discord.api_base,
                config.discord.bot_token.clone(),
            )),
            source,
            router: InvocationRouter::new(),
            settings: Arc::new(WorkflowSettings::from_config(config)),
            discord: config.discord.clone(),
            session: Arc::new(GatewaySession::default()),
        }
    }

    /// Keeps a gateway connection up until Ctrl-C, reconnecting with
    /// exponential backoff after failures.
    pub async fn run(&self) -> crate::error::Result<()> {
        let mut backoff = INITIAL_BACKOFF_SECS;

        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal.map_err(|e| TransportError::Gateway(format!("listen for Ctrl-C: {e}")))?;
                    tracing::info!("Shutting down; {} invocation(s) still open", self.router.active_count());
                    return Ok(());
                }
                result = self.listen() => {
                    match result {
                        Ok(()) => {
                            tracing::info!("Discord gateway connection ended; reconnecting");
                            backoff = INITIAL_BACKOFF_SECS;
                        }
                        Err(e) => {
                            tracing::error!("Discord gateway failed: {e:#}");
                        }
                    }
                }
            }

            tokio::time::sleep(Duration::from_secs(backoff)).await;
            backoff = backoff.saturating_mul(2).min(MAX_BACKOFF_SECS);
        }
    }

    /// One gateway connection: events are handled as they arrive until the
    /// connection ends.
    async fn listen(&self) -> anyhow::Result<()> {
        let gateway = DiscordGateway::new(
            self.discord.bot_token.clone(),
            DEFAULT_INTENTS,
            Arc::clone(&self.session),
        );

        let (event_tx, mut event_rx) = mpsc::channel::<GatewayEvent>(GATEWAY_EVENT_BUFFER);

        let mut gateway_handle = {
            let http = Arc::clone(&self.http);
            tokio::spawn(async move { gateway.connect_and_listen(&http, &event_tx).await })
        };

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_gateway_event(event).await;
                }
                result = &mut gateway_handle => {
                    result.context("Discord gateway task panicked")??;
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_gateway_event(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Ready { user_id, .. } => {
                tracing::info!("Discord: connected as user {user_id}");
            }
            GatewayEvent::InteractionCreate(interaction) => {
                match InteractionType::from_u64(interaction.kind) {
                    Some(InteractionType::ApplicationCommand) => {
                        self.handle_command(interaction).await;
                    }
                    Some(InteractionType::MessageComponent) => {
                        self.handle_component(interaction).await;
                    }
                    _ => {
                        tracing::trace!("Discord: ignoring interaction type {}", interaction.kind);
                    }
                }
            }
        }
    }

    fn matches_guild_filter(&self, guild_id: Option<&str>) -> bool {
        match &self.discord.guild_id {
            Some(gid) => guild_id.is_some_and(|g| g == gid),
            None => true,
        }
    }

    async fn handle_command(&self, interaction: Interaction) {
        if !is_host_shift_command(&interaction.data)
            || !self.matches_guild_filter(interaction.guild_id.as_deref())
        {
            return;
        }

        let Some((guard, mut events)) = self.router.open(&interaction.user_id, &interaction.id)
        else {
            tracing::info!(
                "Discord: {} already has a host-shift open",
                interaction.user_id
            );
            if let Err(e) = reply_ephemeral(
                &self.http,
                &interaction.id,
                &interaction.token,
                messages::ALREADY_OPEN,
            )
            .await
            {
                tracing::warn!("Discord: failed to answer duplicate invocation: {e:#}");
            }
            return;
        };

        if let Err(e) = defer_ephemeral(&self.http, &interaction.id, &interaction.token).await {
            tracing::warn!("Discord: failed to defer interaction: {e:#}");
            return;
        }

        let sink = DiscordSink::new(
            Arc::clone(&self.http),
            self.discord.application_id.clone(),
            interaction.token,
        );
        let source = Arc::clone(&self.source);
        let settings = Arc::clone(&self.settings);
        let owner_id = interaction.user_id;

        tracing::info!("Discord: host-shift opened by {owner_id}");
        tokio::spawn(async move {
            let _route = guard;
            handle_invocation(
                Invocation {
                    owner_id: &owner_id,
                    source: source.as_ref(),
                    sink: &sink,
                    events: &mut events,
                },
                &settings,
            )
            .await;
        });
    }

    async fn handle_component(&self, interaction: Interaction) {
        let Some(origin_id) = interaction.origin_interaction_id.as_deref() else {
            tracing::debug!("Discord: component interaction without origin");
            return;
        };
        let Some((custom_id, values)) = parse_component(&interaction.data) else {
            return;
        };

        if let Err(e) = ack_component(&self.http, &interaction.id, &interaction.token).await {
            tracing::warn!("Discord: failed to acknowledge component: {e:#}");
        }

        let event = ComponentEvent {
            user_id: interaction.user_id.clone(),
            custom_id,
            values,
        };
        self.router.dispatch(origin_id, event);
    }
}

/// Registers the `/host-shift` command, guild-scoped when a guild is set.
pub async fn register(config: &DiscordConfig) -> crate::error::Result<()> {
    let http = DiscordHttpClient::new(&config.api_base, config.bot_token.clone());
    super::commands::register_commands(&http, &config.application_id, config.guild_id.as_deref())
        .await
        .map_err(|e| TransportError::Registration(format!("{e:#}")))?;
    Ok(())
}
