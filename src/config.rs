use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, warn};
use url::Url;

use crate::{PortfolioError, Result, DATA_FOLDER};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_CDN_BASE: &str = "https://cdn.discordapp.com";
pub const DEFAULT_PLACEHOLDER_NAME: &str = "LORDX679";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_PORT: u16 = 5000;

// Left in freshly generated env files; never a real credential.
const TOKEN_PLACEHOLDER: &str = "your_discord_bot_token_here";

/// Settings of the avatar lookup.
#[derive(Debug, Clone)]
pub struct AvatarConfig {
    /// Bot credential for the identity provider.
    /// Without it no lookup is ever attempted.
    pub bot_token: Option<String>,
    pub api_base: String,
    pub cdn_base: String,
    pub timeout: Duration,
    pub placeholder_name: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            cdn_base: DEFAULT_CDN_BASE.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            placeholder_name: DEFAULT_PLACEHOLDER_NAME.to_owned(),
        }
    }
}

impl AvatarConfig {
    pub fn load() -> Result<Self> {
        let config = Self {
            bot_token: var("DISCORD_BOT_TOKEN").ok(),
            api_base: try_load("DISCORD_API_BASE", DEFAULT_API_BASE)?,
            cdn_base: try_load("DISCORD_CDN_BASE", DEFAULT_CDN_BASE)?,
            timeout: Duration::from_millis(try_load(
                "AVATAR_TIMEOUT_MS",
                &DEFAULT_TIMEOUT_MS.to_string(),
            )?),
            placeholder_name: try_load(
                "AVATAR_PLACEHOLDER_NAME",
                DEFAULT_PLACEHOLDER_NAME,
            )?,
        };
        config.validated()
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.bot_token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Normalizes the base URLs and drops unusable credentials.
    pub fn validated(mut self) -> Result<Self> {
        self.api_base = normalize_base(&self.api_base)?;
        self.cdn_base = normalize_base(&self.cdn_base)?;
        self.bot_token = self
            .bot_token
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty() && token != TOKEN_PLACEHOLDER);
        if self.placeholder_name.trim().is_empty() {
            return Err(PortfolioError::Config(
                "placeholder name must not be empty".to_owned(),
            ));
        }
        if self.bot_token.is_none() {
            info!("No Discord bot token configured, avatars use stock images");
        }
        Ok(self)
    }
}

pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub avatar: AvatarConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("PORTFOLIO_PORT", &DEFAULT_PORT.to_string())?,
            data_dir: try_load("PORTFOLIO_DATA_DIR", DATA_FOLDER)?,
            avatar: AvatarConfig::load()?,
        })
    }
}

fn normalize_base(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())?;
    Ok(url.as_str().trim_end_matches('/').to_owned())
}

fn var(key: &str) -> std::result::Result<String, env::VarError> {
    env::var(key).map_err(|e| {
        debug!("Environment variable {key} not found");
        e
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            debug!("{key} not set, using default: {default}");
            default.to_owned()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            PortfolioError::Config(format!("invalid {key}: {e}"))
        })
}
