use anyhow::{Context, Result};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, interval};
use tokio_tungstenite::tungstenite::Message;

use super::http_client::DiscordHttpClient;
use super::types::{DEFAULT_HEARTBEAT_INTERVAL_MS, GatewayOpcode};

const FALLBACK_GATEWAY_URL: &str = "wss://gateway.discord.gg";

/// Resume data kept across reconnects.
#[derive(Debug)]
pub struct GatewaySession {
    pub session_id: Mutex<Option<String>>,
    pub sequence: AtomicI64,
    pub resume_gateway_url: Mutex<Option<String>>,
}

impl Default for GatewaySession {
    fn default() -> Self {
        Self {
            session_id: Mutex::new(None),
            sequence: AtomicI64::new(-1),
            resume_gateway_url: Mutex::new(None),
        }
    }
}

/// An `INTERACTION_CREATE` payload reduced to what the bot routes on.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: String,
    pub token: String,
    pub kind: u64,
    pub channel_id: Option<String>,
    pub guild_id: Option<String>,
    pub user_id: String,
    pub data: Value,
    /// For component interactions: id of the slash-command interaction whose
    /// response carries the component.
    pub origin_interaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    Ready {
        session_id: String,
        resume_gateway_url: String,
        user_id: String,
    },
    InteractionCreate(Interaction),
}

/// Why a connection ended without an error; both lead to a reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Reconnect,
}

pub struct DiscordGateway {
    bot_token: String,
    intents: u64,
    session: Arc<GatewaySession>,
}

impl DiscordGateway {
    pub fn new(bot_token: String, intents: u64, session: Arc<GatewaySession>) -> Self {
        Self {
            bot_token,
            intents,
            session,
        }
    }

    /// Runs one connection until the gateway asks for a reconnect, the
    /// heartbeat goes unanswered, or the socket closes. Returns `Ok(())` in
    /// all of those cases; the caller decides whether to connect again.
    pub async fn connect_and_listen(
        &self,
        http: &DiscordHttpClient,
        tx: &mpsc::Sender<GatewayEvent>,
    ) -> Result<()> {
        let gateway_url = self.resolve_gateway_url(http).await?;
        let ws_url = build_gateway_ws_url(&gateway_url);

        let (ws_stream, _) = tokio_tungstenite::connect_async(&ws_url)
            .await
            .with_context(|| format!("connect Discord gateway websocket: {ws_url}"))?;
        let (mut write, mut read) = ws_stream.split();

        let heartbeat_interval_ms = read_hello_heartbeat_interval(&mut read).await?;
        self.send_identify_or_resume(&mut write).await?;

        let heartbeat_period = Duration::from_millis(heartbeat_interval_ms);
        let mut heartbeat = interval(heartbeat_period);
        let mut awaiting_ack: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if awaiting_ack.is_some() {
                        tracing::warn!("Discord gateway heartbeat ACK missing; reconnecting");
                        return Ok(());
                    }
                    self.send_heartbeat(&mut write).await?;
                    awaiting_ack = Some(Instant::now() + heartbeat_period);
                }
                () = wait_for_ack_timeout(awaiting_ack) => {
                    tracing::warn!("Discord gateway heartbeat ACK timeout; reconnecting");
                    return Ok(());
                }
                message = read.next() => {
                    let Some(message) = message else {
                        tracing::warn!("Discord gateway socket closed; reconnecting");
                        return Ok(());
                    };
                    let message = message.context("read Discord gateway message")?;
                    let flow = self
                        .handle_gateway_message(message, tx, &mut write, &mut awaiting_ack, heartbeat_period)
                        .await?;
                    if flow == Flow::Reconnect {
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn resolve_gateway_url(&self, http: &DiscordHttpClient) -> Result<String> {
        if let Some(url) = self.session.resume_gateway_url.lock().await.clone()
            && !url.is_empty()
        {
            return Ok(url);
        }

        let gateway = http
            .get_gateway_bot()
            .await
            .context("fetch Discord gateway/bot URL")?;
        Ok(gateway
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_GATEWAY_URL)
            .to_string())
    }

    async fn send_identify_or_resume<WsSink>(&self, write: &mut WsSink) -> Result<()>
    where
        WsSink: Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        let session_id = self.session.session_id.lock().await.clone();
        let payload = match session_id {
            Some(session_id) => json!({
                "op": GatewayOpcode::Resume as u8,
                "d": {
                    "token": self.bot_token,
                    "session_id": session_id,
                    "seq": self.session.sequence.load(Ordering::SeqCst),
                }
            }),
            None => json!({
                "op": GatewayOpcode::Identify as u8,
                "d": {
                    "token": self.bot_token,
                    "intents": self.intents,
                    "properties": {
                        "os": std::env::consts::OS,
                        "browser": "hostshift",
                        "device": "hostshift"
                    }
                }
            }),
        };

        write
            .send(Message::Text(payload.to_string().into()))
            .await
            .context("send Discord gateway identify/resume")
    }

    async fn send_heartbeat<WsSink>(&self, write: &mut WsSink) -> Result<()>
    where
        WsSink: Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        let sequence = self.session.sequence.load(Ordering::SeqCst);
        let payload = json!({
            "op": GatewayOpcode::Heartbeat as u8,
            "d": if sequence < 0 { Value::Null } else { json!(sequence) },
        });

        write
            .send(Message::Text(payload.to_string().into()))
            .await
            .context("send Discord gateway heartbeat")
    }

    async fn handle_gateway_message<WsSink>(
        &self,
        message: Message,
        tx: &mpsc::Sender<GatewayEvent>,
        write: &mut WsSink,
        awaiting_ack: &mut Option<Instant>,
        heartbeat_period: Duration,
    ) -> Result<Flow>
    where
        WsSink: Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        let Some(raw) = websocket_message_to_text(message) else {
            return Ok(Flow::Continue);
        };

        let payload: Value = serde_json::from_str(&raw).context("parse Discord gateway payload")?;

        if let Some(sequence) = payload.get("s").and_then(Value::as_i64) {
            self.session.sequence.store(sequence, Ordering::SeqCst);
        }

        let op = payload
            .get("op")
            .and_then(Value::as_u64)
            .and_then(GatewayOpcode::from_u64);

        match op {
            // Server-requested heartbeat: answer right away.
            Some(GatewayOpcode::Heartbeat) => {
                self.send_heartbeat(write).await?;
                awaiting_ack.get_or_insert_with(|| Instant::now() + heartbeat_period);
                Ok(Flow::Continue)
            }
            Some(GatewayOpcode::HeartbeatAck) => {
                *awaiting_ack = None;
                Ok(Flow::Continue)
            }
            Some(GatewayOpcode::Reconnect) => {
                tracing::info!("Discord gateway requested reconnect");
                Ok(Flow::Reconnect)
            }
            Some(GatewayOpcode::InvalidSession) => {
                self.handle_invalid_session(&payload).await;
                Ok(Flow::Reconnect)
            }
            Some(GatewayOpcode::Dispatch) => {
                self.handle_dispatch_payload(&payload, tx).await?;
                Ok(Flow::Continue)
            }
            _ => Ok(Flow::Continue),
        }
    }

    async fn handle_dispatch_payload(
        &self,
        payload: &Value,
        tx: &mpsc::Sender<GatewayEvent>,
    ) -> Result<()> {
        let event_type = payload.get("t").and_then(Value::as_str).unwrap_or("");
        let Some(data) = payload.get("d") else {
            return Ok(());
        };

        let Some(event) = parse_dispatch_event(event_type, data) else {
            return Ok(());
        };

        if let GatewayEvent::Ready {
            session_id,
            resume_gateway_url,
            ..
        } = &event
        {
            *self.session.session_id.lock().await = Some(session_id.clone());
            *self.session.resume_gateway_url.lock().await = Some(resume_gateway_url.clone());
        }

        tx.send(event)
            .await
            .context("dispatch parsed Discord gateway event")
    }

    async fn handle_invalid_session(&self, payload: &Value) {
        let can_resume = payload.get("d").and_then(Value::as_bool).unwrap_or(false);

        self.session.sequence.store(-1, Ordering::SeqCst);
        *self.session.session_id.lock().await = None;

        if can_resume {
            let wait_secs = invalid_session_backoff_secs();
            tracing::warn!(
                "Discord gateway invalid session (resume allowed), waiting {wait_secs}s before reconnect"
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            return;
        }

        tracing::warn!("Discord gateway invalid session (resume denied), clearing resume URL");
        *self.session.resume_gateway_url.lock().await = None;
    }
}

pub fn parse_dispatch_event(event_type: &str, d: &Value) -> Option<GatewayEvent> {
    match event_type {
        "READY" => parse_ready_event(d),
        "INTERACTION_CREATE" => parse_interaction(d).map(GatewayEvent::InteractionCreate),
        "RESUMED" => {
            tracing::info!("Discord gateway session resumed");
            None
        }
        _ => None,
    }
}

fn parse_ready_event(d: &Value) -> Option<GatewayEvent> {
    Some(GatewayEvent::Ready {
        session_id: d.get("session_id")?.as_str()?.to_string(),
        resume_gateway_url: d.get("resume_gateway_url")?.as_str()?.to_string(),
        user_id: d.get("user")?.get("id")?.as_str()?.to_string(),
    })
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn parse_interaction(d: &Value) -> Option<Interaction> {
    // Guild interactions carry the user under `member`, DMs at the top level.
    let user_id = d
        .get("member")
        .and_then(|member| member.get("user"))
        .or_else(|| d.get("user"))
        .and_then(|user| str_field(user, "id"))?;

    let origin_interaction_id = d.get("message").and_then(|message| {
        message
            .get("interaction_metadata")
            .or_else(|| message.get("interaction"))
            .and_then(|origin| str_field(origin, "id"))
    });

    Some(Interaction {
        id: str_field(d, "id")?,
        token: str_field(d, "token")?,
        kind: d.get("type")?.as_u64()?,
        channel_id: str_field(d, "channel_id"),
        guild_id: str_field(d, "guild_id"),
        user_id,
        data: d.get("data").cloned().unwrap_or(Value::Null),
        origin_interaction_id,
    })
}

async fn wait_for_ack_timeout(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => futures_util::future::pending::<()>().await,
    }
}

async fn read_hello_heartbeat_interval<WsRead>(read: &mut WsRead) -> Result<u64>
where
    WsRead:
        Stream<Item = std::result::Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = read.next().await {
        let message = message.context("read Discord gateway hello payload")?;
        let Some(raw) = websocket_message_to_text(message) else {
            continue;
        };

        let payload: Value =
            serde_json::from_str(&raw).context("parse Discord gateway hello JSON")?;

        let op = payload
            .get("op")
            .and_then(Value::as_u64)
            .and_then(GatewayOpcode::from_u64);

        if op == Some(GatewayOpcode::Hello) {
            return Ok(payload
                .get("d")
                .and_then(|d| d.get("heartbeat_interval"))
                .and_then(Value::as_u64)
                .filter(|interval| *interval > 0)
                .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL_MS));
        }
    }

    Err(anyhow::anyhow!("Discord gateway closed before Hello"))
}

fn websocket_message_to_text(message: Message) -> Option<String> {
    match message {
        Message::Text(text) => Some(text.to_string()),
        Message::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok(),
        _ => None,
    }
}

fn build_gateway_ws_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    format!("{trimmed}/?v=10&encoding=json")
}

fn invalid_session_backoff_secs() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.subsec_nanos())
        .unwrap_or(0);
    1 + u64::from(nanos % 5)
}
