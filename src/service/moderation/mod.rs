//! Timed moderation actions with automatic lifting.
//!
//! Applying a timed ban or mute stores the action as a record and schedules a task that
//! lifts it at its expiry. The task only carries the action's record id; when it fires
//! the lift callback re-reads the record, so an action lifted by hand in the meantime is
//! left alone. Lifting by hand cancels the scheduled task.
//!
//! `ModerationService` is the entry point for a command layer; the bot itself only
//! registers the lift callbacks, so actions stored by earlier runs still expire.
//!
//! - `gateway` - Discord side effects behind the `ModerationGateway` trait
//! - `expire` - The scheduled lift callbacks and their registration

pub mod expire;
pub mod gateway;

#[cfg(test)]
mod test;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    data::resource::ResourceRepository,
    error::{moderation::ModerationError, AppError},
    model::{
        moderation::{audit_reason, BanParams, ChannelMute, MuteParams, ServerBan},
        record_id::RecordId,
        resource::{Resource, ResourceMeta},
        task::CreateTaskParams,
    },
    scheduler::Scheduler,
};

use self::{
    expire::{LIFT_CHANNEL_MUTE, LIFT_SERVER_BAN},
    gateway::{ModerationGateway, Notice},
};

/// Embed color of ban notices.
const BAN_COLOR: u32 = 0xe74c3c;
/// Embed color of mute notices.
const MUTE_COLOR: u32 = 0xf39c12;

/// Applies and lifts server bans and channel mutes.
pub struct ModerationService {
    scheduler: Scheduler,
    gateway: Arc<dyn ModerationGateway>,
    bans: ResourceRepository<ServerBan>,
    mutes: ResourceRepository<ChannelMute>,
}

impl ModerationService {
    /// Creates a new ModerationService.
    ///
    /// # Arguments
    /// - `scheduler` - Scheduler for auto-lift tasks; its store also holds the actions
    /// - `gateway` - Discord side of bans, mutes and notices
    pub fn new(scheduler: Scheduler, gateway: Arc<dyn ModerationGateway>) -> Self {
        let store = scheduler.store().clone();

        Self {
            scheduler,
            gateway,
            bans: ResourceRepository::new(store.clone()),
            mutes: ResourceRepository::new(store),
        }
    }

    /// Bans a member, lifting the ban automatically at `params.until` if given.
    ///
    /// The target is notified before the ban, while they still share a server with the
    /// bot. A failed notice does not stop the ban.
    ///
    /// # Returns
    /// - `Ok(ServerBan)` - The stored ban
    /// - `Err(AppError::ModerationErr)` - `until` is not in the future
    /// - `Err(AppError::DiscordErr)` - Discord rejected the ban; nothing was stored
    /// - `Err(AppError)` - Storing the ban or scheduling its lift failed
    pub async fn ban(&self, params: BanParams) -> Result<ServerBan, AppError> {
        check_expiry(params.until)?;

        self.send_notice(params.target_id, ban_notice(&params)).await;

        let reason = audit_reason(&params.issuer_name, params.reason.as_deref(), params.until);
        self.gateway
            .ban(params.target_id, params.delete_message_days, &reason)
            .await?;

        let mut ban = ServerBan {
            meta: ResourceMeta::new(ServerBan::TABLE),
            issuer_id: params.issuer_id,
            target_id: params.target_id,
            reason: params.reason,
            delete_message_days: params.delete_message_days,
            auto_lift_task: None,
        };
        ban = self.bans.store(&ban).await?;

        if let Some(until) = params.until {
            let task_id = self
                .schedule_lift(until, LIFT_SERVER_BAN, ServerBan::TABLE, ban.id())
                .await?;
            ban.auto_lift_task = Some(task_id);
            ban = self.bans.store(&ban).await?;
        }

        tracing::info!(
            "Banned user {} ({}), expires {:?}",
            ban.target_id,
            ban.id(),
            params.until
        );

        Ok(ban)
    }

    /// Lifts every stored ban of a member and unbans them.
    ///
    /// Pending auto-lift tasks are cancelled. A member with no stored ban is still
    /// unbanned, covering bans made outside the bot.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of stored bans that were lifted
    /// - `Err(AppError)` - Store or Discord error
    pub async fn unban(&self, target_id: u64) -> Result<usize, AppError> {
        let bans = self.bans.find_where("target_id", target_id).await?;

        for ban in &bans {
            if let Some(task_id) = &ban.auto_lift_task {
                self.scheduler.cancel_by_id(task_id).await?;
            }
            self.bans.delete(ban.id()).await?;
        }

        self.gateway.unban(target_id).await?;

        tracing::info!("Unbanned user {}, lifted {} bans", target_id, bans.len());

        Ok(bans.len())
    }

    /// Mutes a member in one channel, lifting the mute automatically at `params.until`
    /// if given.
    ///
    /// # Returns
    /// - `Ok(ChannelMute)` - The stored mute
    /// - `Err(AppError::ModerationErr)` - `until` is not in the future
    /// - `Err(AppError::DiscordErr)` - Discord rejected the overwrite; nothing was stored
    /// - `Err(AppError)` - Storing the mute or scheduling its lift failed
    pub async fn mute(&self, params: MuteParams) -> Result<ChannelMute, AppError> {
        check_expiry(params.until)?;

        self.gateway.mute(params.channel_id, params.target_id).await?;

        let mut mute = ChannelMute {
            meta: ResourceMeta::new(ChannelMute::TABLE),
            issuer_id: params.issuer_id,
            target_id: params.target_id,
            channel_id: params.channel_id,
            reason: params.reason.clone(),
            auto_lift_task: None,
        };
        mute = self.mutes.store(&mute).await?;

        if let Some(until) = params.until {
            let task_id = self
                .schedule_lift(until, LIFT_CHANNEL_MUTE, ChannelMute::TABLE, mute.id())
                .await?;
            mute.auto_lift_task = Some(task_id);
            mute = self.mutes.store(&mute).await?;
        }

        tracing::info!(
            "Muted user {} in channel {} ({}): {}",
            mute.target_id,
            mute.channel_id,
            mute.id(),
            audit_reason(&params.issuer_name, params.reason.as_deref(), params.until)
        );

        self.send_notice(params.target_id, mute_notice(&params)).await;

        Ok(mute)
    }

    /// Lifts a member's stored mutes in one channel and removes their overwrite.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of stored mutes that were lifted
    /// - `Err(AppError)` - Store or Discord error
    pub async fn unmute(&self, target_id: u64, channel_id: u64) -> Result<usize, AppError> {
        let mutes: Vec<ChannelMute> = self
            .mutes
            .find_where("target_id", target_id)
            .await?
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .collect();

        for mute in &mutes {
            if let Some(task_id) = &mute.auto_lift_task {
                self.scheduler.cancel_by_id(task_id).await?;
            }
            self.mutes.delete(mute.id()).await?;
        }

        self.gateway.unmute(channel_id, target_id).await?;

        tracing::info!(
            "Unmuted user {} in channel {}, lifted {} mutes",
            target_id,
            channel_id,
            mutes.len()
        );

        Ok(mutes.len())
    }

    /// Lists a member's stored bans.
    pub async fn bans_of(&self, target_id: u64) -> Result<Vec<ServerBan>, AppError> {
        Ok(self.bans.find_where("target_id", target_id).await?)
    }

    /// Lists a member's stored mutes across all channels.
    pub async fn mutes_of(&self, target_id: u64) -> Result<Vec<ChannelMute>, AppError> {
        Ok(self.mutes.find_where("target_id", target_id).await?)
    }

    async fn schedule_lift(
        &self,
        until: DateTime<Utc>,
        callback: &str,
        task_type: &str,
        action_id: &RecordId,
    ) -> Result<RecordId, AppError> {
        let task = self
            .scheduler
            .create_and_schedule(
                CreateTaskParams::new(until, callback)
                    .arg(action_id.to_string())
                    .task_type(task_type),
            )
            .await?;

        Ok(task.meta.id)
    }

    async fn send_notice(&self, target_id: u64, notice: Notice) {
        if let Err(e) = self.gateway.notify(target_id, notice).await {
            tracing::debug!("Could not notify user {}: {}", target_id, e);
        }
    }
}

fn check_expiry(until: Option<DateTime<Utc>>) -> Result<(), ModerationError> {
    match until {
        Some(until) if until <= Utc::now() => Err(ModerationError::ExpiryInPast(until)),
        _ => Ok(()),
    }
}

/// Discord timestamp markup rendered in the reader's timezone.
fn discord_timestamp(ts: DateTime<Utc>) -> String {
    format!("<t:{}:f>", ts.timestamp())
}

fn ban_notice(params: &BanParams) -> Notice {
    let mut fields = Vec::new();
    if let Some(reason) = &params.reason {
        fields.push(("The given reason for your ban is".to_string(), reason.clone()));
    }
    if let Some(until) = params.until {
        fields.push(("Your ban expires".to_string(), discord_timestamp(until)));
    }

    Notice {
        title: "Banned".to_string(),
        description: "You have been banned from the server. If you wish to appeal this ban, \
                      please contact the staff team."
            .to_string(),
        fields,
        color: BAN_COLOR,
    }
}

fn mute_notice(params: &MuteParams) -> Notice {
    let mut fields = Vec::new();
    if let Some(reason) = &params.reason {
        fields.push(("The given reason for this mute is".to_string(), reason.clone()));
    }
    if let Some(until) = params.until {
        fields.push(("This mute expires".to_string(), discord_timestamp(until)));
    }

    Notice {
        title: "Muted".to_string(),
        description: format!(
            "You were muted in <#{}>. If you believe this is a mistake, please contact staff \
             through ModMail.",
            params.channel_id
        ),
        fields,
        color: MUTE_COLOR,
    }
}
