
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::commands::command::{Command, CommandError, CommandParams};
use crate::utility::*;


#[derive(Clone, Copy, Debug, PartialEq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AutoPingAction {
    Start,
    Stop,
}

pub struct AutoPingCommand;

impl Command for AutoPingCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new("auto_ping", "Start or stop scheduled pings to an opt-in role in the sandbox channel.")
            .add_required("action", "start or stop", AutoPingAction::iter().map(|action| action.to_string()).collect())
            .add_optional("cron", "Cron expr (default: */5 * * * *)")
    }

    fn run<'a>(&'a self, params: CommandParams<'a>) -> BoxedFuture<'a, Result<(), CommandError>> {
        Box::pin(
            async move {

                let state = params.state;
                let action: AutoPingAction = params.options.parse("action")
                    .ok_or_else(|| self.invalid_option("action"))?;

                let sandbox = state.platform.text_channel(state.config.sandbox_channel).await
                    .ok_or(CommandError::ChannelNotFound("Sandbox channel not found."))?;

                match action {
                    AutoPingAction::Start => {
                        let expression = params.options.get("cron")
                            .map(str::trim)
                            .filter(|expression| !expression.is_empty())
                            .unwrap_or(DEFAULT_SCHEDULE);
                        let content = format!("{} scheduled check-in (safe auto-ping).",
                            mention_role(state.config.optin_role));

                        state.broadcaster.lock().await
                            .start(expression, sandbox.id, content)?;
                        params.respond(format!("Auto-ping started with cron `{}`.", expression)).await;
                    }
                    AutoPingAction::Stop => {
                        state.broadcaster.lock().await.stop();
                        params.respond("Auto-ping stopped.").await;
                    }
                }
                Ok(())
            }
        )
    }

}
