
use crate::commands::command::{Command, CommandError, CommandParams};
use crate::utility::*;


const RAID_MESSAGES: u32 = 25;

pub struct RaidSimCommand;

impl Command for RaidSimCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new("raid_sim", "Simulate raid by generating dummy messages into the log channel (safe).")
    }

    fn run<'a>(&'a self, params: CommandParams<'a>) -> BoxedFuture<'a, Result<(), CommandError>> {
        Box::pin(
            async move {

                let state = params.state;
                let log = state.platform.text_channel(state.config.log_channel).await
                    .ok_or(CommandError::ChannelNotFound("Log channel not found."))?;
                params.respond(format!("Generating {} dummy “raid” messages in log channel…", RAID_MESSAGES)).await;

                // one at a time, the order is part of the simulation
                for index in 1..=RAID_MESSAGES {
                    let content = format!("[SIM] Raid message {} — this is a harmless test message.", index);
                    state.platform.send(log.id, content).await?;
                }
                state.platform.send(log.id, "Simulation complete. No real users pinged.".to_string()).await?;

                Logger::info_long("Raid simulation finished", &format!("{} message(s)", RAID_MESSAGES + 1));
                Ok(())
            }
        )
    }

}
