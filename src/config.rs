//! Configuration types.
//!
//! Everything comes from environment variables (optionally loaded from a `.env`
//! file by the binary). Unset keys fall back to defaults; malformed ones fail.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::dispatch::DispatchConfig;
use crate::error::ConfigError;

pub const DATA_PATH_KEY: &str = "NOTICEBOT_DATA_PATH";
pub const TICK_SECS_KEY: &str = "NOTICEBOT_TICK_SECS";
pub const NOTIFY_TIMEOUT_SECS_KEY: &str = "NOTICEBOT_NOTIFY_TIMEOUT_SECS";
pub const LOG_DIR_KEY: &str = "NOTICEBOT_LOG_DIR";
pub const TELEGRAM_TOKEN_KEY: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_ALLOWED_USERS_KEY: &str = "TELEGRAM_ALLOWED_USERS";

/// Telegram gateway settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    /// Usernames or numeric ids; `*` admits everyone.
    pub allowed_users: Vec<String>,
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Reminder file.
    pub data_path: PathBuf,
    pub dispatch: DispatchConfig,
    /// Present when a bot token is configured. Without it the bot runs on the CLI.
    pub telegram: Option<TelegramConfig>,
    /// Directory for daily-rolling log files. Logs go to stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("reminders.json"),
            dispatch: DispatchConfig::default(),
            telegram: None,
            log_dir: None,
        }
    }
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let data_path = get(DATA_PATH_KEY)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let dispatch = DispatchConfig {
            tick_interval: seconds(TICK_SECS_KEY, get(TICK_SECS_KEY))?
                .unwrap_or(defaults.dispatch.tick_interval),
            notify_timeout: seconds(NOTIFY_TIMEOUT_SECS_KEY, get(NOTIFY_TIMEOUT_SECS_KEY))?
                .unwrap_or(defaults.dispatch.notify_timeout),
        };

        let telegram = get(TELEGRAM_TOKEN_KEY).map(|token| TelegramConfig {
            bot_token: SecretString::from(token.trim().to_string()),
            allowed_users: parse_allowed_users(
                get(TELEGRAM_ALLOWED_USERS_KEY).as_deref().unwrap_or("*"),
            ),
        });

        Ok(Self {
            data_path,
            dispatch,
            telegram,
            log_dir: get(LOG_DIR_KEY).map(PathBuf::from),
        })
    }
}

/// Parse a positive whole number of seconds.
fn seconds(key: &str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".into(),
        }),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}' is not a number of seconds: {e}", raw.trim()),
        }),
    }
}

fn parse_allowed_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_start_matches('@').to_string())
        .collect()
}
