
pub mod command_manager;

pub mod command;
pub use command::{Command, CommandError, CommandOptions, CommandParams, GuardRejection, Invocation};

// ---- src/commands/moderation/ ---- //

pub mod moderation;

pub use moderation::nuke_safe::NukeSafeCommand;
pub use moderation::raid_sim::RaidSimCommand;
pub use moderation::auto_ping::AutoPingCommand;
pub use moderation::ghost_ping_detector::GhostPingDetectorCommand;
