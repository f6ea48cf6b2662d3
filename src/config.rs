use crate::error::{config::ConfigError, AppError};

/// Bump reminder settings, present when `BUMP_CHANNEL_ID` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpConfig {
    /// Channel DISBOARD confirms bumps in, and where reminders are posted.
    pub channel_id: u64,
    /// Roles mentioned by each reminder.
    pub ping_roles: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,
    /// The single guild the bot moderates.
    pub guild_id: u64,
    pub bump: Option<BumpConfig>,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(AppError::ConfigErr)` - A required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds the configuration from a variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let guild_id = parse_u64("GUILD_ID", &required("GUILD_ID")?)?;

        let bump = match lookup("BUMP_CHANNEL_ID").filter(|v| !v.trim().is_empty()) {
            Some(channel) => Some(BumpConfig {
                channel_id: parse_u64("BUMP_CHANNEL_ID", &channel)?,
                ping_roles: parse_u64_list(
                    "BUMP_PING_ROLES",
                    &lookup("BUMP_PING_ROLES").unwrap_or_default(),
                )?,
            }),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            guild_id,
            bump,
        })
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a comma separated list of ids, ignoring empty entries.
fn parse_u64_list(name: &str, value: &str) -> Result<Vec<u64>, ConfigError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_u64(name, part))
        .collect()
}
