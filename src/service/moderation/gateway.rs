//! Discord side effects of moderation actions.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{
        ChannelId, CreateEmbed, CreateMessage, GuildId, PermissionOverwrite,
        PermissionOverwriteType, Permissions, UserId,
    },
    http::Http,
};

use crate::error::AppError;

/// Permissions denied to a member muted in a channel.
pub const CHANNEL_MUTE_DENY: Permissions = Permissions::SEND_MESSAGES
    .union(Permissions::SEND_MESSAGES_IN_THREADS)
    .union(Permissions::CREATE_PRIVATE_THREADS)
    .union(Permissions::CREATE_PUBLIC_THREADS)
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::SPEAK)
    .union(Permissions::MANAGE_ROLES)
    .union(Permissions::MANAGE_WEBHOOKS);

/// Direct message sent to the target of a moderation action.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    /// Embed fields as (name, value) pairs.
    pub fields: Vec<(String, String)>,
    pub color: u32,
}

/// Operations moderation needs from Discord.
#[async_trait]
pub trait ModerationGateway: Send + Sync {
    async fn ban(&self, user_id: u64, delete_message_days: u8, reason: &str)
        -> Result<(), AppError>;

    async fn unban(&self, user_id: u64) -> Result<(), AppError>;

    /// Adds a member permission overwrite denying `CHANNEL_MUTE_DENY` in a channel.
    async fn mute(&self, channel_id: u64, user_id: u64) -> Result<(), AppError>;

    /// Removes the member's permission overwrite from a channel.
    async fn unmute(&self, channel_id: u64, user_id: u64) -> Result<(), AppError>;

    /// Sends the member a direct message.
    async fn notify(&self, user_id: u64, notice: Notice) -> Result<(), AppError>;
}

/// Gateway acting on the configured guild through the bot's HTTP client.
pub struct DiscordModerationGateway {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl DiscordModerationGateway {
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }
}

#[async_trait]
impl ModerationGateway for DiscordModerationGateway {
    async fn ban(
        &self,
        user_id: u64,
        delete_message_days: u8,
        reason: &str,
    ) -> Result<(), AppError> {
        self.guild_id
            .ban_with_reason(&self.http, UserId::new(user_id), delete_message_days, reason)
            .await?;

        Ok(())
    }

    async fn unban(&self, user_id: u64) -> Result<(), AppError> {
        self.guild_id.unban(&self.http, UserId::new(user_id)).await?;

        Ok(())
    }

    async fn mute(&self, channel_id: u64, user_id: u64) -> Result<(), AppError> {
        let overwrite = PermissionOverwrite {
            allow: Permissions::empty(),
            deny: CHANNEL_MUTE_DENY,
            kind: PermissionOverwriteType::Member(UserId::new(user_id)),
        };

        ChannelId::new(channel_id)
            .create_permission(&self.http, overwrite)
            .await?;

        Ok(())
    }

    async fn unmute(&self, channel_id: u64, user_id: u64) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .delete_permission(
                &self.http,
                PermissionOverwriteType::Member(UserId::new(user_id)),
            )
            .await?;

        Ok(())
    }

    async fn notify(&self, user_id: u64, notice: Notice) -> Result<(), AppError> {
        let embed = CreateEmbed::new()
            .title(notice.title)
            .description(notice.description)
            .color(notice.color)
            .fields(
                notice
                    .fields
                    .into_iter()
                    .map(|(name, value)| (name, value, false)),
            );

        UserId::new(user_id)
            .direct_message(&self.http, CreateMessage::new().embed(embed))
            .await?;

        Ok(())
    }
}
