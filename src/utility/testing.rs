
use serenity::model::id::ChannelId;
use anyhow::anyhow;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::utility::*;


pub const OWNER: u64 = 11;
pub const GUILD: u64 = 22;
pub const SANDBOX: u64 = 33;
pub const LOG: u64 = 44;
pub const OPTIN_ROLE: u64 = 55;

pub fn test_config() -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "DISCORD_TOKEN" => return Some("token".to_string()),
            "OWNER_ID" => OWNER,
            "ALLOWLIST_GUILD_ID" => GUILD,
            "SANDBOX_CHANNEL_ID" => SANDBOX,
            "LOG_CHANNEL_ID" => LOG,
            "OPTIN_ROLE_ID" => OPTIN_ROLE,
            _ => return None,
        };
        Some(value.to_string())
    }).unwrap()
}

/// Shared state wired to a fresh fake platform with the sandbox and log channels present.
pub fn test_state() -> (Arc<FakePlatform>, BotState) {
    let platform = Arc::new(FakePlatform::new());
    platform.add_channel(ChannelId::new(SANDBOX), "sandbox", 3, 0);
    platform.add_channel(ChannelId::new(LOG), "mod-log", 4, 0);
    let state = BotState::new(test_config(), platform.clone());
    (platform, state)
}

struct FakeChannel {
    info: ChannelInfo,
    // oldest first
    messages: Vec<u64>,
}

/// In-memory stand-in for the chat platform.
pub struct FakePlatform {
    channels: Mutex<HashMap<ChannelId, FakeChannel>>,
    sent: Mutex<Vec<(ChannelId, String)>>,
    next_id: AtomicU64,
    fail_sends: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakePlatform {

    pub fn new() -> FakePlatform {
        FakePlatform {
            channels: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(10_000),
            fail_sends: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn add_channel(&self, id: ChannelId, name: &str, position: u16, messages: u64) {
        let info = ChannelInfo { id, name: name.to_string(), position };
        let messages = (1..=messages).collect();
        self.channels.lock().unwrap().insert(id, FakeChannel { info, messages });
    }

    pub fn messages(&self, id: ChannelId) -> Vec<u64> {
        self.channels.lock().unwrap()
            .get(&id)
            .map(|channel| channel.messages.clone())
            .unwrap_or_default()
    }

    pub fn channel(&self, id: ChannelId) -> Option<ChannelInfo> {
        self.channels.lock().unwrap().get(&id).map(|channel| channel.info.clone())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

}

impl ChatPlatform for FakePlatform {

    fn text_channel(&self, channel: ChannelId) -> BoxedFuture<'_, Option<ChannelInfo>> {
        Box::pin(async move { self.channel(channel) })
    }

    fn clone_channel<'a>(&'a self, source: &'a ChannelInfo, _reason: &'a str) -> BoxedFuture<'a, anyhow::Result<ChannelInfo>> {
        Box::pin(async move {
            let id = ChannelId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
            let mut channels = self.channels.lock().unwrap();
            let original = channels.get(&source.id).ok_or_else(|| anyhow!("unknown channel"))?;

            // the platform appends new channels at the bottom
            let info = ChannelInfo {
                id,
                name: original.info.name.clone(),
                position: u16::MAX,
            };
            channels.insert(id, FakeChannel { info: info.clone(), messages: Vec::new() });
            Ok(info)
        })
    }

    fn set_position(&self, channel: ChannelId, position: u16) -> BoxedFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            let mut channels = self.channels.lock().unwrap();
            let channel = channels.get_mut(&channel).ok_or_else(|| anyhow!("unknown channel"))?;
            channel.info.position = position;
            Ok(())
        })
    }

    fn bulk_delete(&self, channel: ChannelId, limit: u8) -> BoxedFuture<'_, anyhow::Result<usize>> {
        Box::pin(async move {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(anyhow!("missing permissions"));
            }
            let mut channels = self.channels.lock().unwrap();
            let channel = channels.get_mut(&channel).ok_or_else(|| anyhow!("unknown channel"))?;
            let keep = channel.messages.len().saturating_sub(limit as usize);
            let removed = channel.messages.split_off(keep);
            Ok(removed.len())
        })
    }

    fn send(&self, channel: ChannelId, content: String) -> BoxedFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(anyhow!("send failed"));
            }
            self.sent.lock().unwrap().push((channel, content));
            Ok(())
        })
    }

}

/// Collects every private reply in order.
#[derive(Default)]
pub struct RecordingReply {
    replies: Mutex<Vec<String>>,
}

impl RecordingReply {

    pub fn new() -> RecordingReply {
        RecordingReply::default()
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

}

impl Reply for RecordingReply {
    fn reply(&self, content: String) -> BoxedFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            self.replies.lock().unwrap().push(content);
            Ok(())
        })
    }
}
