mod env_overrides;
mod loader;
mod schema;
#[cfg(test)]
mod test_env;

pub use loader::default_config_path;
pub use schema::{Config, DiscordConfig, TrelloConfig, WorkflowConfig};
