
use serenity::all::{
    Channel, ChannelId, ChannelType, CommandInteraction, CreateChannel,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EditChannel, GetMessages, GuildChannel, MessageId,
};
use serenity::http::Http;
use anyhow::anyhow;
use chrono::Utc;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utility::*;


// discord refuses to bulk delete messages older than two weeks
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub position: u16,
}

/// The channel and message operations the bot needs from the chat platform.
pub trait ChatPlatform: Send + Sync {

    /// Resolves a guild text channel, `None` if it does not exist or has another type.
    fn text_channel(&self, channel: ChannelId) -> BoxedFuture<'_, Option<ChannelInfo>>;

    fn clone_channel<'a>(&'a self, source: &'a ChannelInfo, reason: &'a str) -> BoxedFuture<'a, anyhow::Result<ChannelInfo>>;

    fn set_position(&self, channel: ChannelId, position: u16) -> BoxedFuture<'_, anyhow::Result<()>>;

    /// Deletes up to `limit` of the most recent messages and returns how many were removed.
    fn bulk_delete(&self, channel: ChannelId, limit: u8) -> BoxedFuture<'_, anyhow::Result<usize>>;

    fn send(&self, channel: ChannelId, content: String) -> BoxedFuture<'_, anyhow::Result<()>>;

}

/// Private answer channel back to whoever invoked a command.
pub trait Reply: Send + Sync {
    fn reply(&self, content: String) -> BoxedFuture<'_, anyhow::Result<()>>;
}


pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {

    pub fn new(http: Arc<Http>) -> SerenityPlatform {
        SerenityPlatform { http }
    }

    async fn guild_text_channel(&self, channel: ChannelId) -> Option<GuildChannel> {
        match channel.to_channel(&self.http).await {
            Ok(Channel::Guild(channel)) if channel.kind == ChannelType::Text => Some(channel),
            Ok(_) => None,
            Err(err) => {
                Logger::warn_long(&format!("Could not resolve channel {}", channel), &err.to_string());
                None
            }
        }
    }

}

impl ChatPlatform for SerenityPlatform {

    fn text_channel(&self, channel: ChannelId) -> BoxedFuture<'_, Option<ChannelInfo>> {
        Box::pin(async move {
            self.guild_text_channel(channel).await.map(|channel| ChannelInfo {
                id: channel.id,
                name: channel.name,
                position: channel.position,
            })
        })
    }

    fn clone_channel<'a>(&'a self, source: &'a ChannelInfo, reason: &'a str) -> BoxedFuture<'a, anyhow::Result<ChannelInfo>> {
        Box::pin(async move {

            // the lightweight info does not carry overwrites, refetch the full channel
            let original = self.guild_text_channel(source.id).await
                .ok_or_else(|| anyhow!("channel {} disappeared before it could be cloned", source.id))?;

            let mut builder = CreateChannel::new(original.name.clone())
                .kind(original.kind)
                .nsfw(original.nsfw)
                .permissions(original.permission_overwrites.clone())
                .audit_log_reason(reason);
            if let Some(topic) = &original.topic {
                builder = builder.topic(topic.clone());
            }
            if let Some(parent) = original.parent_id {
                builder = builder.category(parent);
            }
            if let Some(rate_limit) = original.rate_limit_per_user {
                builder = builder.rate_limit_per_user(rate_limit);
            }

            let clone = original.guild_id.create_channel(&self.http, builder).await?;
            Ok(ChannelInfo {
                id: clone.id,
                name: clone.name,
                position: clone.position,
            })
        })
    }

    fn set_position(&self, channel: ChannelId, position: u16) -> BoxedFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            channel.edit(&self.http, EditChannel::new().position(position)).await?;
            Ok(())
        })
    }

    fn bulk_delete(&self, channel: ChannelId, limit: u8) -> BoxedFuture<'_, anyhow::Result<usize>> {
        Box::pin(async move {
            let messages = channel.messages(&self.http, GetMessages::new().limit(limit)).await?;

            // silently skip what the api would reject
            let cutoff = Utc::now().timestamp() - BULK_DELETE_MAX_AGE_SECS;
            let deletable: Vec<MessageId> = messages.iter()
                .map(|message| message.id)
                .filter(|id| id.created_at().unix_timestamp() > cutoff)
                .collect();
            if deletable.is_empty() {
                return Ok(0);
            }

            let count = deletable.len();
            channel.delete_messages(&self.http, deletable).await?;
            Ok(count)
        })
    }

    fn send(&self, channel: ChannelId, content: String) -> BoxedFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            channel.say(&self.http, content).await?;
            Ok(())
        })
    }

}


/// Answers a slash command ephemerally, the first reply is the interaction
/// response and every later one a follow-up.
pub struct InteractionReply {
    http: Arc<Http>,
    interaction: CommandInteraction,
    responded: AtomicBool,
}

impl InteractionReply {

    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> InteractionReply {
        InteractionReply {
            http,
            interaction,
            responded: AtomicBool::new(false),
        }
    }

}

impl Reply for InteractionReply {

    fn reply(&self, content: String) -> BoxedFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            if self.responded.swap(true, Ordering::SeqCst) {
                let followup = CreateInteractionResponseFollowup::new()
                    .content(content)
                    .ephemeral(true);
                self.interaction.create_followup(&self.http, followup).await?;
            } else {
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(content)
                        .ephemeral(true));
                self.interaction.create_response(&self.http, response).await?;
            }
            Ok(())
        })
    }

}
