
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::commands::command::{Command, CommandError, CommandParams};
use crate::utility::*;


#[derive(Clone, Copy, Debug, PartialEq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DetectorState {
    On,
    Off,
}

pub struct GhostPingDetectorCommand;

impl Command for GhostPingDetectorCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new("ghost_ping_detector", "Enable or disable ghost-ping detection logging.")
            .add_required("state", "on or off", DetectorState::iter().map(|state| state.to_string()).collect())
    }

    fn run<'a>(&'a self, params: CommandParams<'a>) -> BoxedFuture<'a, Result<(), CommandError>> {
        Box::pin(
            async move {

                let state: DetectorState = params.options.parse("state")
                    .ok_or_else(|| self.invalid_option("state"))?;
                let enabled = state == DetectorState::On;
                params.state.detector.set_enabled(enabled);

                let label = match enabled {
                    true  => "ENABLED",
                    false => "DISABLED",
                };
                Logger::info_long("Ghost-ping detector", label);
                params.respond(format!("Ghost-ping detector **{}**.", label)).await;
                Ok(())
            }
        )
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::commands::command::CommandOptions;
    use crate::utility::testing::*;

    async fn toggle(state: &BotState, value: &str) -> (Result<(), CommandError>, Vec<String>) {
        let reply = RecordingReply::new();
        let options = CommandOptions::new([("state", value)]);
        let result = GhostPingDetectorCommand.run(CommandParams { state, options: &options, reply: &reply }).await;
        (result, reply.replies())
    }

    #[tokio::test]
    async fn toggles_detection() {
        let (_, state) = test_state();
        assert!(state.detector.is_enabled());

        let (result, replies) = toggle(&state, "off").await;
        assert!(result.is_ok());
        assert!(!state.detector.is_enabled());
        assert_eq!(replies, vec!["Ghost-ping detector **DISABLED**.".to_string()]);

        let (_, replies) = toggle(&state, "on").await;
        assert!(state.detector.is_enabled());
        assert_eq!(replies, vec!["Ghost-ping detector **ENABLED**.".to_string()]);
    }

    #[tokio::test]
    async fn rejects_other_values() {
        let (_, state) = test_state();
        let (result, replies) = toggle(&state, "maybe").await;
        assert!(matches!(result, Err(CommandError::InvalidOption { name: "state", .. })));
        assert!(replies.is_empty());
        assert!(state.detector.is_enabled());
    }

}
