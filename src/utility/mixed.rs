
use serenity::model::id::{ChannelId, RoleId, UserId};

use std::pin::Pin;
use std::future::Future;


pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub fn mention_user(user: UserId) -> String {
    format!("<@{}>", user)
}

pub fn mention_role(role: RoleId) -> String {
    format!("<@&{}>", role)
}

pub fn mention_channel(channel: ChannelId) -> String {
    format!("<#{}>", channel)
}

pub fn yes_no(value: bool) -> &'static str {
    match value {
        true  => "yes",
        false => "no",
    }
}
