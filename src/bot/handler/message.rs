use serenity::all::{Context, Message};

use crate::{service::bump_reminder::is_bump_confirmation, state::AppState};

/// Handle message creation in a channel
///
/// Schedules the next bump reminder when DISBOARD confirms a bump in the bump channel.
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    let Some(bump_reminder) = &state.bump_reminder else {
        return;
    };

    if message.channel_id.get() != bump_reminder.channel_id() {
        return;
    }

    let image_urls = message
        .embeds
        .iter()
        .filter_map(|embed| embed.image.as_ref())
        .map(|image| image.url.as_str());

    if !is_bump_confirmation(message.author.id.get(), image_urls) {
        return;
    }

    if let Err(e) = bump_reminder.handle_bump(&ctx.http).await {
        tracing::error!(
            "Failed to handle bump in channel {}: {}",
            message.channel_id,
            e
        );
    }
}
