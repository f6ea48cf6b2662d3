//! Discord gateway integration.
//!
//! The bot listens for DISBOARD bump confirmations and otherwise only logs its
//! connection. It is started after the scheduler has restored its tasks, so no event can
//! create a task before recovery is complete.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability
//! - `GUILD_MESSAGES` - Messages in the bump channel
//! - `MESSAGE_CONTENT` - Embeds of other bots' messages (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled in the
//! Discord Developer Portal for the bot application.

pub mod handler;
pub mod start;
