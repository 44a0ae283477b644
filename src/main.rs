
use serenity::http::Http;
use serenity::prelude::{Client, GatewayIntents};
use anyhow::Context;

use std::sync::Arc;

use utility::*;
use commands::command_manager::CommandManager;
use handler::Handler;

mod handler;
mod utility;
mod commands;


#[tokio::main]
async fn main() -> anyhow::Result<()> {

    // setup
    let config = Config::from_env()?;
    let token = config.token.clone();
    let http = Arc::new(Http::new(&token));
    let state = BotState::new(config, Arc::new(SerenityPlatform::new(http)));
    let handler = Handler::new(state.clone(), CommandManager::new());

    // expired mention records are swept in the background for the whole run
    state.detector.spawn_sweeper();

    // start client
    let intents = GatewayIntents::GUILDS                    |
                  GatewayIntents::GUILD_MESSAGES            |
                  GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .context("Error creating client")?;

    Logger::info("Connecting to Discord");
    client.start().await.context("Client stopped with an error")?;
    Ok(())
}
