use anyhow::Result;

use super::Commands;
use crate::config::Config;
use crate::discord::{HostShiftBot, register};
use crate::shifts::{ShiftCandidate, TaskSource, TrelloClient, filter_shifts};

pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Run => run(&config).await,
        Commands::Register => register_command(&config).await,
        Commands::Shifts => list_shifts(&config).await,
    }
}

async fn run(config: &Config) -> Result<()> {
    config.validate()?;
    tracing::info!(
        "Serving /host-shift; announcements go to channel {}",
        config.discord.announce_channel_id
    );
    HostShiftBot::new(config).run().await?;
    Ok(())
}

async fn register_command(config: &Config) -> Result<()> {
    if config.discord.bot_token.trim().is_empty() || config.discord.application_id.trim().is_empty()
    {
        anyhow::bail!("discord.bot_token and discord.application_id are required to register commands");
    }
    register(&config.discord).await?;
    match config.discord.guild_id.as_deref() {
        Some(guild) => println!("Registered /host-shift in guild {guild}."),
        None => println!("Registered /host-shift globally."),
    }
    Ok(())
}

async fn list_shifts(config: &Config) -> Result<()> {
    config.validate_trello()?;
    let source = TrelloClient::new(&config.trello);
    let cards = source.fetch_candidates(&config.trello.list_id).await?;
    let fetched = cards.len();
    let shifts = filter_shifts(cards, config.workflow.max_shifts);

    if shifts.is_empty() {
        println!("No shifts with due dates found ({fetched} card(s) on the list).");
        return Ok(());
    }

    println!("{} of {fetched} card(s) offered:", shifts.len());
    for shift in &shifts {
        println!("{}", describe(shift));
    }
    Ok(())
}

fn describe(shift: &ShiftCandidate) -> String {
    let host = shift.host_ref.as_deref().unwrap_or("-");
    format!(
        "  {:<24} {:<32} host={host} id={}",
        shift.name,
        shift.formatted_due(),
        shift.id
    )
}
