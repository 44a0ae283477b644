
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utility::*;


/// The parts of a freshly created message the detector cares about.
#[derive(Clone, Debug)]
pub struct ObservedMessage {
    pub message_id: MessageId,
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
    pub author_is_bot: bool,
    pub mentioned_users: Vec<UserId>,
    pub mentioned_roles: Vec<RoleId>,
    pub mentions_everyone: bool,
}

impl ObservedMessage {

    pub fn has_mentions(&self) -> bool {
        !self.mentioned_users.is_empty()
            || !self.mentioned_roles.is_empty()
            || self.mentions_everyone
    }

}

impl From<&Message> for ObservedMessage {
    fn from(message: &Message) -> ObservedMessage {
        ObservedMessage {
            message_id: message.id,
            guild_id: message.guild_id,
            author_id: message.author.id,
            author_is_bot: message.author.bot,
            mentioned_users: message.mentions.iter().map(|user| user.id).collect(),
            mentioned_roles: message.mention_roles.clone(),
            mentions_everyone: message.mention_everyone,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GhostPingReport {
    pub author_id: UserId,
    pub users: usize,
    pub roles: usize,
    pub everyone: bool,
}

impl From<MentionRecord> for GhostPingReport {
    fn from(record: MentionRecord) -> GhostPingReport {
        GhostPingReport {
            author_id: record.author_id,
            users: record.mentioned_users.len(),
            roles: record.mentioned_roles.len(),
            everyone: record.mentions_everyone,
        }
    }
}

impl fmt::Display for GhostPingReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "👻 **Ghost-ping suspected** by {}. Mentions: users={} roles={} everyone={}",
            mention_user(self.author_id),
            self.users,
            self.roles,
            yes_no(self.everyone))
    }
}

/// Correlates message creation and deletion to spot ghost-pings.
///
/// Cheap to clone, all clones share the same ledger and toggle.
#[derive(Clone)]
pub struct GhostPingDetector {
    ledger: Arc<Mutex<MentionLedger>>,
    enabled: Arc<AtomicBool>,
}

impl GhostPingDetector {

    pub fn new() -> GhostPingDetector {
        GhostPingDetector {
            ledger: Arc::new(Mutex::new(MentionLedger::new())),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Remembers a message if it mentions anyone. Returns whether it was recorded.
    pub async fn on_message_created(&self, message: ObservedMessage) -> bool {
        if !self.is_enabled() || message.author_is_bot || !message.has_mentions() {
            return false;
        }
        let Some(guild_id) = message.guild_id else {
            return false;
        };

        let record = MentionRecord::new(
            message.message_id,
            guild_id,
            message.author_id,
            message.mentioned_users,
            message.mentioned_roles,
            message.mentions_everyone);
        self.ledger.lock().await.record(record);

        Logger::debug(&format!("Tracking mentions of message {}", message.message_id));
        true
    }

    /// Matches a deletion against the ledger without sending anything.
    pub async fn correlate(&self, message_id: MessageId, guild_id: Option<GuildId>) -> Option<GhostPingReport> {
        if !self.is_enabled() {
            return None;
        }
        let guild_id = guild_id?;
        let record = self.ledger.lock().await.consume(message_id)?;
        if record.guild_id != guild_id {
            return None;
        }
        Some(record.into())
    }

    /// Correlates a deletion and posts the report to `report_channel`.
    ///
    /// Delivery failures are logged and otherwise dropped.
    pub async fn on_message_deleted(&self,
                                    platform: &dyn ChatPlatform,
                                    report_channel: ChannelId,
                                    message_id: MessageId,
                                    guild_id: Option<GuildId>) -> Option<GhostPingReport> {
        let report = self.correlate(message_id, guild_id).await?;
        Logger::info_long("Ghost-ping suspected", &format!("message {} by {}", message_id, report.author_id));
        if let Err(err) = platform.send(report_channel, report.to_string()).await {
            Logger::swallowed("Could not deliver ghost-ping report", err);
        }
        Some(report)
    }

    /// Periodically drops expired ledger entries for as long as the runtime lives.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let removed = ledger.lock().await.sweep();
                if removed > 0 {
                    Logger::debug(&format!("Dropped {} expired mention record(s)", removed));
                }
            }
        })
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::utility::testing::FakePlatform;

    use tokio::time::Duration;

    const GUILD: GuildId = GuildId::new(1);
    const LOG: ChannelId = ChannelId::new(500);

    fn message(id: u64, users: &[u64], roles: &[u64], everyone: bool) -> ObservedMessage {
        ObservedMessage {
            message_id: MessageId::new(id),
            guild_id: Some(GUILD),
            author_id: UserId::new(77),
            author_is_bot: false,
            mentioned_users: users.iter().map(|user| UserId::new(*user)).collect(),
            mentioned_roles: roles.iter().map(|role| RoleId::new(*role)).collect(),
            mentions_everyone: everyone,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deletion_within_window_reports_once() {
        let detector = GhostPingDetector::new();
        let platform = FakePlatform::new();
        assert!(detector.on_message_created(message(10, &[1, 2], &[], false)).await);

        tokio::time::advance(Duration::from_secs(5)).await;
        let report = detector.on_message_deleted(&platform, LOG, MessageId::new(10), Some(GUILD)).await;
        assert_eq!(report, Some(GhostPingReport {
            author_id: UserId::new(77),
            users: 2,
            roles: 0,
            everyone: false,
        }));
        assert_eq!(platform.sent(), vec![(LOG,
            "👻 **Ghost-ping suspected** by <@77>. Mentions: users=2 roles=0 everyone=no".to_string())]);

        // a second deletion event for the same message stays silent
        assert!(detector.on_message_deleted(&platform, LOG, MessageId::new(10), Some(GUILD)).await.is_none());
        assert_eq!(platform.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_deletion_is_not_reported() {
        let detector = GhostPingDetector::new();
        detector.on_message_created(message(10, &[1], &[], false)).await;

        tokio::time::advance(Duration::from_secs(121)).await;
        assert!(detector.correlate(MessageId::new(10), Some(GUILD)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn messages_without_mentions_or_from_bots_are_ignored() {
        let detector = GhostPingDetector::new();
        assert!(!detector.on_message_created(message(10, &[], &[], false)).await);

        let mut bot = message(11, &[1], &[], false);
        bot.author_is_bot = true;
        assert!(!detector.on_message_created(bot).await);

        let mut direct = message(12, &[1], &[], false);
        direct.guild_id = None;
        assert!(!detector.on_message_created(direct).await);

        for id in 10..=12 {
            assert!(detector.correlate(MessageId::new(id), Some(GUILD)).await.is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn roles_and_everyone_count_as_mentions() {
        let detector = GhostPingDetector::new();
        detector.on_message_created(message(10, &[], &[5, 6], false)).await;
        detector.on_message_created(message(11, &[], &[], true)).await;

        let roles = detector.correlate(MessageId::new(10), Some(GUILD)).await.unwrap();
        assert_eq!((roles.users, roles.roles, roles.everyone), (0, 2, false));
        let everyone = detector.correlate(MessageId::new(11), Some(GUILD)).await.unwrap();
        assert!(everyone.everyone);
        assert!(everyone.to_string().ends_with("everyone=yes"));
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_suppresses_reports_without_backfill() {
        let detector = GhostPingDetector::new();
        detector.on_message_created(message(10, &[1], &[], false)).await;
        detector.on_message_created(message(11, &[1], &[], false)).await;

        detector.set_enabled(false);
        assert!(detector.correlate(MessageId::new(10), Some(GUILD)).await.is_none());
        assert!(!detector.on_message_created(message(12, &[1], &[], false)).await);

        detector.set_enabled(true);
        assert!(detector.correlate(MessageId::new(11), Some(GUILD)).await.is_some());
        assert!(detector.correlate(MessageId::new(12), Some(GUILD)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn deletion_in_other_guild_is_ignored() {
        let detector = GhostPingDetector::new();
        detector.on_message_created(message(10, &[1], &[], false)).await;
        assert!(detector.correlate(MessageId::new(10), Some(GuildId::new(2))).await.is_none());
        assert!(detector.correlate(MessageId::new(10), None).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delivery_still_consumes() {
        let detector = GhostPingDetector::new();
        let platform = FakePlatform::new();
        platform.fail_sends(true);
        detector.on_message_created(message(10, &[1], &[], false)).await;

        let report = detector.on_message_deleted(&platform, LOG, MessageId::new(10), Some(GUILD)).await;
        assert!(report.is_some());
        assert!(platform.sent().is_empty());
        assert!(detector.correlate(MessageId::new(10), Some(GUILD)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_prunes_expired_records() {
        let detector = GhostPingDetector::new();
        detector.on_message_created(message(10, &[1], &[], false)).await;
        let sweeper = detector.spawn_sweeper();

        tokio::time::sleep(RETENTION + SWEEP_INTERVAL).await;
        assert_eq!(detector.ledger.lock().await.len(), 0);
        sweeper.abort();
    }

}
