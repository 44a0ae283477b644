
use serenity::model::id::{GuildId, MessageId, RoleId, UserId};
use tokio::time::{Duration, Instant};

use std::collections::{HashMap, HashSet};


/// How long a mentioning message stays eligible for ghost-ping detection.
pub const RETENTION: Duration = Duration::from_secs(120);

/// How often expired entries are dropped from the ledger.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq)]
pub struct MentionRecord {
    pub message_id: MessageId,
    pub guild_id: GuildId,
    pub author_id: UserId,
    pub mentioned_users: HashSet<UserId>,
    pub mentioned_roles: HashSet<RoleId>,
    pub mentions_everyone: bool,
    pub created_at: Instant,
}

impl MentionRecord {

    pub fn new(message_id: MessageId,
               guild_id: GuildId,
               author_id: UserId,
               mentioned_users: impl IntoIterator<Item = UserId>,
               mentioned_roles: impl IntoIterator<Item = RoleId>,
               mentions_everyone: bool) -> MentionRecord {
        MentionRecord {
            message_id,
            guild_id,
            author_id,
            mentioned_users: mentioned_users.into_iter().collect(),
            mentioned_roles: mentioned_roles.into_iter().collect(),
            mentions_everyone,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= RETENTION
    }

}

/// Short-lived store of messages that mentioned someone, keyed by message id.
///
/// Entries never get their window renewed. An entry past its deadline is
/// treated as absent even before the next sweep removes it.
#[derive(Default)]
pub struct MentionLedger {
    records: HashMap<MessageId, MentionRecord>,
}

impl MentionLedger {

    pub fn new() -> MentionLedger {
        MentionLedger::default()
    }

    /// Inserts or overwrites the record for its message. Overwriting a live
    /// record keeps its original deadline.
    pub fn record(&mut self, mut record: MentionRecord) {
        let now = Instant::now();
        record.created_at = match self.records.get(&record.message_id) {
            Some(existing) if !existing.is_expired(now) => existing.created_at,
            _ => now,
        };
        self.records.insert(record.message_id, record);
    }

    /// Removes and returns the record, if it is still within its window.
    pub fn consume(&mut self, message_id: MessageId) -> Option<MentionRecord> {
        let record = self.records.remove(&message_id)?;
        match record.is_expired(Instant::now()) {
            true  => None,
            false => Some(record),
        }
    }

    /// Drops every expired record and returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let now = Instant::now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before - self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

}
