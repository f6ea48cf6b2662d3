//! DISBOARD bump reminders.
//!
//! DISBOARD lets a server be bumped once every two hours. When its bot confirms a bump
//! in the bump channel, a reminder task is scheduled for the end of the cooldown. The
//! reminder pings the configured roles in the same channel.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serenity::{
    all::{ChannelId, CreateEmbed, CreateMessage},
    http::Http,
};
use tokio::sync::Mutex;

use crate::{
    error::{task::RegistryError, AppError},
    model::task::{CreateTaskParams, Task},
    scheduler::{
        registry::{CallbackRegistry, TaskCall},
        Scheduler,
    },
};

/// Callback name and task type of bump reminders.
pub const BUMP_REMINDER: &str = "bump_reminder";
/// User id of the DISBOARD bot.
pub const DISBOARD_BOT_ID: u64 = 302050872383242240;
/// Image DISBOARD attaches to its bump confirmation embed.
pub const BUMP_IMAGE_URL: &str = "https://disboard.org/images/bot-command-image-bump.png";

const BUMP_COLOR: u32 = 0x24b7b7;

/// Time between two bumps allowed by DISBOARD.
pub fn bump_cooldown() -> Duration {
    Duration::hours(2)
}

/// Returns true if a message is DISBOARD confirming a successful bump.
///
/// # Arguments
/// - `author_id` - Id of the message author
/// - `image_urls` - Image URLs of the message's embeds
pub fn is_bump_confirmation<'a>(
    author_id: u64,
    mut image_urls: impl Iterator<Item = &'a str>,
) -> bool {
    author_id == DISBOARD_BOT_ID && image_urls.any(|url| url == BUMP_IMAGE_URL)
}

/// Schedules bump reminders for a single channel.
pub struct BumpReminderService {
    scheduler: Scheduler,
    channel_id: u64,
    /// Held across cancel and create so two bumps cannot leave two reminders.
    schedule_lock: Mutex<()>,
}

impl BumpReminderService {
    pub fn new(scheduler: Scheduler, channel_id: u64) -> Self {
        Self {
            scheduler,
            channel_id,
            schedule_lock: Mutex::new(()),
        }
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    /// Replaces any pending reminder with one due a cooldown after `bumped_at`.
    ///
    /// # Returns
    /// - `Ok(Task)` - The scheduled reminder
    /// - `Err(AppError)` - Store error while cancelling or creating reminders
    pub async fn schedule_next(&self, bumped_at: DateTime<Utc>) -> Result<Task, AppError> {
        let _guard = self.schedule_lock.lock().await;

        for pending in self.scheduler.find_by_type(BUMP_REMINDER).await? {
            self.scheduler.cancel(&pending).await?;
        }

        self.scheduler
            .create_and_schedule(
                CreateTaskParams::new(bumped_at + bump_cooldown(), BUMP_REMINDER)
                    .arg(self.channel_id),
            )
            .await
    }

    /// Schedules the next reminder and thanks the bumper in the bump channel.
    ///
    /// # Returns
    /// - `Ok(Task)` - The scheduled reminder
    /// - `Err(AppError)` - Scheduling failed, or the thank-you message could not be sent
    pub async fn handle_bump(&self, http: &Http) -> Result<Task, AppError> {
        let task = self.schedule_next(Utc::now()).await?;

        let embed = CreateEmbed::new()
            .title("Thanks for the bump!")
            .description(thanks_description(task.scheduled_for))
            .color(BUMP_COLOR);

        ChannelId::new(self.channel_id)
            .send_message(http, CreateMessage::new().embed(embed))
            .await?;

        tracing::info!("Bump confirmed, next reminder at {}", task.scheduled_for);

        Ok(task)
    }
}

/// Posts the reminder in the channel named by the task's first argument.
pub async fn send_reminder(
    http: &Http,
    ping_roles: &[u64],
    call: TaskCall,
) -> Result<(), AppError> {
    let channel_id: u64 = call.arg(0)?;

    let embed = CreateEmbed::new()
        .title("Time to bump!")
        .description("Bump our server on DISBOARD by doing `/bump`.")
        .color(BUMP_COLOR);

    let mut message = CreateMessage::new().embed(embed);
    if let Some(content) = role_mentions(ping_roles) {
        message = message.content(content);
    }

    ChannelId::new(channel_id).send_message(http, message).await?;

    tracing::info!("Sent bump reminder to channel {}", channel_id);

    Ok(())
}

/// Registers the reminder callback.
pub fn register(
    registry: &mut CallbackRegistry,
    http: Arc<Http>,
    ping_roles: Vec<u64>,
) -> Result<(), RegistryError> {
    let ping_roles: Arc<[u64]> = ping_roles.into();

    registry.register_fn(BUMP_REMINDER, move |call| {
        let http = http.clone();
        let ping_roles = ping_roles.clone();
        async move { send_reminder(&http, &ping_roles, call).await }
    })
}

fn thanks_description(next_bump: DateTime<Utc>) -> String {
    format!(
        "I'll remind you when the server can be bumped again, <t:{}:R>.",
        next_bump.timestamp()
    )
}

fn role_mentions(role_ids: &[u64]) -> Option<String> {
    if role_ids.is_empty() {
        return None;
    }

    Some(
        role_ids
            .iter()
            .map(|id| format!("<@&{}>", id))
            .collect::<Vec<_>>()
            .join(" "),
    )
}
