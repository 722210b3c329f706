//! Discord transport: REST client, gateway connection, interaction routing
//! and the [`NotificationSink`](crate::sink::NotificationSink) the workflow
//! renders through.

pub mod bot;
pub mod commands;
pub mod gateway;
pub mod http_client;
pub mod router;
pub mod sink;
pub mod types;

pub use bot::{HostShiftBot, register};
pub use http_client::DiscordHttpClient;
pub use router::{InvocationRouter, RouteGuard};
pub use sink::DiscordSink;
