
use serenity::model::permissions::Permissions;

use crate::commands::command::{Command, CommandError, CommandParams};
use crate::utility::*;


// discord caps a single fetch and bulk delete at 100 messages
const PURGE_LIMIT: u8 = 100;

pub struct NukeSafeCommand;

impl Command for NukeSafeCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new("nuke_safe", "Clone sandbox channel and clear recent messages (safe).")
            .default_permissions(Permissions::MANAGE_CHANNELS)
    }

    fn run<'a>(&'a self, params: CommandParams<'a>) -> BoxedFuture<'a, Result<(), CommandError>> {
        Box::pin(
            async move {

                let state = params.state;
                let platform = &state.platform;

                let sandbox = platform.text_channel(state.config.sandbox_channel).await
                    .ok_or(CommandError::ChannelNotFound("Sandbox channel not found or not text."))?;
                params.respond(format!("Cloning and clearing **#{}**…", sandbox.name)).await;

                // new channels land at the bottom of the list, move the clone back in place
                let clone = platform.clone_channel(&sandbox, "nuke_safe").await?;
                platform.set_position(clone.id, sandbox.position).await?;

                match platform.bulk_delete(sandbox.id, PURGE_LIMIT).await {
                    Ok(count) => Logger::info_long("Purged sandbox", &format!("{} message(s)", count)),
                    Err(err) => Logger::swallowed("Could not purge sandbox", err),
                }

                params.respond(format!(
                    "Done. Clone created: {}. Last 100 messages cleared in sandbox.",
                    mention_channel(clone.id))).await;
                Ok(())
            }
        )
    }

}
