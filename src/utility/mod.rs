
pub mod mixed;
pub mod logger;
pub mod config;
pub mod platform;
pub mod cron;
pub mod broadcaster;
pub mod mention_ledger;
pub mod ghost_detector;
pub mod usage_builder;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use mixed::*;
pub use logger::Logger;
pub use config::{Config, ConfigError};
pub use platform::{ChannelInfo, ChatPlatform, Reply, SerenityPlatform, InteractionReply};
pub use cron::{CronExpr, CronError};
pub use broadcaster::{Broadcaster, DEFAULT_SCHEDULE};
pub use mention_ledger::{MentionLedger, MentionRecord, RETENTION, SWEEP_INTERVAL};
pub use ghost_detector::{GhostPingDetector, GhostPingReport, ObservedMessage};
pub use usage_builder::UsageBuilder;
pub use state::BotState;
