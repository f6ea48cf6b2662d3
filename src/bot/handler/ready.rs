//! Ready event handler.
//!
//! Fired once per gateway connection after the initial handshake.

use serenity::all::{Context, Ready};

use crate::state::AppState;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared application state
/// - `_ctx` - Discord context
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, _ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord, {} scheduled tasks armed",
        ready.user.name,
        state.scheduler.armed_count()
    );
}
