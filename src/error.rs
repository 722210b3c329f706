use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `hostshift`.
///
/// Each collaborator defines its own error variant. Library callers can match
/// on these to decide recovery strategy; transport internals continue to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum HostShiftError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Task source (Trello) ────────────────────────────────────────────
    #[error("task source: {0}")]
    Source(#[from] SourceError),

    // ── Notification sink (Discord) ─────────────────────────────────────
    #[error("notification sink: {0}")]
    Sink(#[from] SinkError),

    // ── Discord transport ───────────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Task source errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{resource} request failed: {message}")]
    Request { resource: String, message: String },

    #[error("{resource} returned status {status}")]
    Status { resource: String, status: u16 },

    #[error("{resource} response could not be decoded: {message}")]
    Decode { resource: String, message: String },
}

// ─── Notification sink errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("render failed: {0}")]
    Render(String),

    #[error("clearing controls failed: {0}")]
    Clear(String),

    #[error("broadcast to channel {channel} failed: {message}")]
    Broadcast { channel: String, message: String },
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("gateway: {0}")]
    Gateway(String),

    #[error("command registration failed: {0}")]
    Registration(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, HostShiftError>;
