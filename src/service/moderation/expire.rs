//! Scheduled callbacks that lift expired moderation actions.
//!
//! Each callback receives the action's record id as its only argument and re-reads the
//! record. A missing record means the action was already lifted, so there is nothing
//! left to do.

use std::sync::Arc;

use crate::{
    data::{resource::ResourceRepository, store::RecordStore},
    error::{task::RegistryError, AppError},
    model::{
        moderation::{ChannelMute, ServerBan},
        record_id::RecordId,
    },
    scheduler::registry::{CallbackRegistry, TaskCall},
};

use super::gateway::ModerationGateway;

/// Callback name of the server ban auto-lift.
pub const LIFT_SERVER_BAN: &str = "lift_server_ban";
/// Callback name of the channel mute auto-lift.
pub const LIFT_CHANNEL_MUTE: &str = "lift_channel_mute";

/// Lifts the server ban named by the task's first argument.
///
/// # Returns
/// - `Ok(())` - The ban was lifted, or no longer exists
/// - `Err(AppError)` - Invalid argument, store error or Discord error
pub async fn lift_server_ban(
    bans: &ResourceRepository<ServerBan>,
    gateway: &dyn ModerationGateway,
    call: TaskCall,
) -> Result<(), AppError> {
    let ban_id: RecordId = call.arg(0)?;

    let Some(ban) = bans.get(&ban_id).await? else {
        tracing::debug!("Ban {} was already lifted", ban_id);
        return Ok(());
    };

    bans.delete(&ban_id).await?;
    gateway.unban(ban.target_id).await?;

    tracing::info!("Ban {} of user {} expired", ban_id, ban.target_id);

    Ok(())
}

/// Lifts the channel mute named by the task's first argument.
///
/// # Returns
/// - `Ok(())` - The mute was lifted, or no longer exists
/// - `Err(AppError)` - Invalid argument, store error or Discord error
pub async fn lift_channel_mute(
    mutes: &ResourceRepository<ChannelMute>,
    gateway: &dyn ModerationGateway,
    call: TaskCall,
) -> Result<(), AppError> {
    let mute_id: RecordId = call.arg(0)?;

    let Some(mute) = mutes.get(&mute_id).await? else {
        tracing::debug!("Mute {} was already lifted", mute_id);
        return Ok(());
    };

    mutes.delete(&mute_id).await?;
    gateway.unmute(mute.channel_id, mute.target_id).await?;

    tracing::info!(
        "Mute {} of user {} in channel {} expired",
        mute_id,
        mute.target_id,
        mute.channel_id
    );

    Ok(())
}

/// Registers the auto-lift callbacks.
pub fn register(
    registry: &mut CallbackRegistry,
    store: Arc<dyn RecordStore>,
    gateway: Arc<dyn ModerationGateway>,
) -> Result<(), RegistryError> {
    let bans_store = store.clone();
    let bans_gateway = gateway.clone();
    registry.register_fn(LIFT_SERVER_BAN, move |call| {
        let bans = ResourceRepository::<ServerBan>::new(bans_store.clone());
        let gateway = bans_gateway.clone();
        async move { lift_server_ban(&bans, gateway.as_ref(), call).await }
    })?;

    registry.register_fn(LIFT_CHANNEL_MUTE, move |call| {
        let mutes = ResourceRepository::<ChannelMute>::new(store.clone());
        let gateway = gateway.clone();
        async move { lift_channel_mute(&mutes, gateway.as_ref(), call).await }
    })?;

    Ok(())
}
