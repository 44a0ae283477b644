
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use thiserror::Error;

use std::env;


#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("environment variable {key} is not a valid id: {value:?}")]
    InvalidId { key: &'static str, value: String },
}

/// Runtime settings, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    pub owner_id: UserId,
    pub guild_id: GuildId,
    pub sandbox_channel: ChannelId,
    pub log_channel: ChannelId,
    pub optin_role: RoleId,
}

impl Config {

    /// Loads `.env` if one exists, then reads the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let token = required(&lookup, "DISCORD_TOKEN")?;
        Ok(Config {
            token,
            owner_id: UserId::new(snowflake(&lookup, "OWNER_ID")?),
            guild_id: GuildId::new(snowflake(&lookup, "ALLOWLIST_GUILD_ID")?),
            sandbox_channel: ChannelId::new(snowflake(&lookup, "SANDBOX_CHANNEL_ID")?),
            log_channel: ChannelId::new(snowflake(&lookup, "LOG_CHANNEL_ID")?),
            optin_role: RoleId::new(snowflake(&lookup, "OPTIN_ROLE_ID")?),
        })
    }

}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

// ids are non-zero u64 snowflakes, the id constructors panic on zero
fn snowflake(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<u64, ConfigError> {
    let value = required(lookup, key)?;
    match value.parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ConfigError::InvalidId { key, value }),
    }
}
