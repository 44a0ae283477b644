
use serenity::async_trait;
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::all::{ActivityData, ChannelId, GuildId, MessageId};
use serenity::prelude::*;

use std::sync::Arc;

use crate::commands::command_manager::CommandManager;
use crate::commands::Invocation;
use crate::utility::*;


pub struct Handler {
    state: BotState,
    command_manager: CommandManager,
}

impl Handler {

    pub fn new(state: BotState, command_manager: CommandManager) -> Handler {
        Handler {
            state,
            command_manager,
        }
    }

}

#[async_trait]
impl EventHandler for Handler {

    async fn ready(&self, ctx: Context, ready: Ready) {

        Logger::info_long("Logged in as", &ready.user.tag());

        // commands only ever exist in the allow-listed guild
        let guild_id = self.state.config.guild_id;
        match guild_id.set_commands(&ctx.http, self.command_manager.definitions()).await {
            Ok(commands) => Logger::info_long(
                "Registered commands",
                &format!("{} in guild {}", commands.len(), guild_id)),
            Err(err) => Logger::err_long("Could not register commands", &err.to_string()),
        }

        ctx.set_activity(Some(ActivityData::playing("Safe testing only 🛡️")));
    }

    #[cfg(feature = "commands")]
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {

        let Interaction::Command(command) = interaction else {
            return;
        };

        #[cfg(feature = "debug")]
        Logger::info_long("Received command", &command.data.name);

        let invocation = Invocation::from(&command);
        let reply = InteractionReply::new(Arc::clone(&ctx.http), command);
        self.command_manager.execute(&self.state, invocation, &reply).await;
    }

    #[cfg(feature = "ghost_ping")]
    async fn message(&self, _ctx: Context, msg: Message) {
        self.state.detector
            .on_message_created(ObservedMessage::from(&msg)).await;
    }

    #[cfg(feature = "ghost_ping")]
    async fn message_delete(&self,
                            _ctx: Context,
                            _channel_id: ChannelId,
                            deleted_message_id: MessageId,
                            guild_id: Option<GuildId>
    ) {
        self.state.detector.on_message_deleted(
            self.state.platform.as_ref(),
            self.state.config.log_channel,
            deleted_message_id,
            guild_id).await;
    }

}
