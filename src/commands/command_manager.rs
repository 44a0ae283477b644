
use serenity::builder::CreateCommand;

use crate::commands::*;
use crate::commands::command::guard;
use crate::utility::*;


pub struct CommandManager {
    commands: Vec<Box<dyn Command>>,
}

impl CommandManager {

    pub fn new() -> CommandManager {
        CommandManager {
            commands: vec![
                Box::new(NukeSafeCommand {}),
                Box::new(RaidSimCommand {}),
                Box::new(AutoPingCommand {}),
                Box::new(GhostPingDetectorCommand {}),
            ],
        }
    }

    /// Registration payloads for every known command.
    pub fn definitions(&self) -> Vec<CreateCommand> {
        self.commands.iter()
            .map(|command| command.define_usage().build())
            .collect()
    }

    /// Guards, runs and answers a single invocation. Never fails, every error
    /// ends up as a private reply to the invoker.
    pub async fn execute(&self, state: &BotState, invocation: Invocation, reply: &dyn Reply) {

        let Some(command) = self.commands.iter().find(|command| command.name() == invocation.name) else {
            Logger::warn_long("Unknown command", &invocation.name);
            return;
        };

        let result = match guard(&state.config, invocation.guild_id, invocation.user_id) {
            Ok(()) => {
                let params = CommandParams { state, options: &invocation.options, reply };
                command.run(params).await
            }
            Err(rejection) => Err(rejection.into()),
        };

        match &result {
            Ok(()) => Logger::info_long("Executed command", &invocation.name),
            Err(CommandError::Rejected(rejection)) => Logger::info_long(
                &format!("Rejected /{} from {}", invocation.name, invocation.user_id),
                &rejection.to_string()),
            Err(CommandError::Platform(err)) => Logger::err_long(
                &format!("/{} failed", invocation.name),
                &format!("{:#}", err)),
            Err(err) => Logger::warn_long(&format!("/{} aborted", invocation.name), &err.to_string()),
        }

        if let Err(err) = result {
            if let Err(delivery) = reply.reply(err.user_message()).await {
                Logger::swallowed("Could not reply to interaction", delivery);
            }
        }
    }

}
