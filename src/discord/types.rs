//! Numeric codes of the Discord API used by the bot.

/// Slash commands and components arrive without privileged intents.
pub const DEFAULT_INTENTS: u64 = intents::GUILDS;

/// Used when Hello omits `heartbeat_interval` (ms).
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 41250;

/// `flags` bit that hides an interaction response from everyone but the invoker.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

/// Gateway opcodes the client sends or reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GatewayOpcode {
    Dispatch = 0,
    Heartbeat = 1,
    Identify = 2,
    Resume = 6,
    Reconnect = 7,
    InvalidSession = 9,
    Hello = 10,
    HeartbeatAck = 11,
}

impl GatewayOpcode {
    pub fn from_u64(value: u64) -> Option<Self> {
        Some(match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            6 => Self::Resume,
            7 => Self::Reconnect,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            _ => return None,
        })
    }
}

/// Interaction kinds the bot distinguishes; everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InteractionType {
    Ping = 1,
    ApplicationCommand = 2,
    MessageComponent = 3,
}

impl InteractionType {
    pub fn from_u64(value: u64) -> Option<Self> {
        Some(match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            _ => return None,
        })
    }
}

/// `type` of an interaction callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InteractionCallbackType {
    /// Immediate reply.
    ChannelMessageWithSource = 4,
    /// "Thinking..." now, content later through the original response.
    DeferredChannelMessageWithSource = 5,
    /// Component acknowledged; the message is edited separately.
    DeferredUpdateMessage = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ComponentType {
    ActionRow = 1,
    Button = 2,
    StringSelect = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ButtonStyleCode {
    Primary = 1,
    Secondary = 2,
    Success = 3,
    Danger = 4,
}

pub mod intents {
    pub const GUILDS: u64 = 1;
    pub const GUILD_MESSAGES: u64 = 1 << 9;
}
