
use serenity::all::{CommandInteraction, GuildId, UserId};
use thiserror::Error;

use std::collections::HashMap;
use std::str::FromStr;

use crate::utility::*;


#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum GuardRejection {
    #[error("This command works only in the allow-listed test server.")]
    WrongGuild,

    #[error("Only the bot owner can run this command.")]
    NotOwner,
}

/// Every command is restricted to the owner inside the allow-listed guild.
pub fn guard(config: &Config, guild_id: Option<GuildId>, user_id: UserId) -> Result<(), GuardRejection> {
    if guild_id != Some(config.guild_id) {
        return Err(GuardRejection::WrongGuild);
    }
    if user_id != config.owner_id {
        return Err(GuardRejection::NotOwner);
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Rejected(#[from] GuardRejection),

    #[error("{0}")]
    ChannelNotFound(&'static str),

    #[error("Missing or invalid option `{name}`. Usage: `{usage}`")]
    InvalidOption { name: &'static str, usage: String },

    #[error("Invalid cron expression: {0}")]
    InvalidSchedule(#[from] CronError),

    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

impl CommandError {

    /// The line shown privately to the invoker.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Platform(_) => "Something went wrong while running this command.".to_string(),
            other => other.to_string(),
        }
    }

}

/// String options of an invocation, by option name.
#[derive(Clone, Debug, Default)]
pub struct CommandOptions {
    values: HashMap<String, String>,
}

impl CommandOptions {

    pub fn new<K: Into<String>, V: Into<String>>(values: impl IntoIterator<Item = (K, V)>) -> CommandOptions {
        CommandOptions {
            values: values.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|value| value.as_str())
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.parse().ok())
    }

}

/// One slash command invocation, detached from the gateway payload.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub name: String,
    pub guild_id: Option<GuildId>,
    pub user_id: UserId,
    pub options: CommandOptions,
}

impl From<&CommandInteraction> for Invocation {
    fn from(interaction: &CommandInteraction) -> Invocation {
        let options = interaction.data.options.iter()
            .filter_map(|option| option.value.as_str().map(|value| (option.name.clone(), value.to_string())));
        Invocation {
            name: interaction.data.name.clone(),
            guild_id: interaction.guild_id,
            user_id: interaction.user.id,
            options: CommandOptions::new(options),
        }
    }
}

pub struct CommandParams<'a> {
    pub state: &'a BotState,
    pub options: &'a CommandOptions,
    pub reply: &'a dyn Reply,
}

impl<'a> CommandParams<'a> {

    /// Sends a private reply, logging instead of failing when it cannot be delivered.
    pub async fn respond(&self, content: impl Into<String>) {
        if let Err(err) = self.reply.reply(content.into()).await {
            Logger::swallowed("Could not reply to interaction", err);
        }
    }

}

pub trait Command: Send + Sync {

    fn define_usage(&self) -> UsageBuilder;

    fn run<'a>(&'a self, params: CommandParams<'a>) -> BoxedFuture<'a, Result<(), CommandError>>;

    fn name(&self) -> &'static str {
        self.define_usage().name
    }

    fn invalid_option(&self, name: &'static str) -> CommandError {
        CommandError::InvalidOption { name, usage: self.define_usage().syntax() }
    }

}
