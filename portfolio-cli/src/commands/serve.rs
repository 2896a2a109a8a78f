use std::path::PathBuf;
use std::time::Duration;

use portfolio::{server, Config};

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "serve", about = "Serve the portfolio API")]
pub struct Serve {
    #[clap(short, long, help = "Port to listen on [env: PORTFOLIO_PORT]")]
    port: Option<u16>,
    #[clap(
        long,
        value_parser,
        help = "Folder holding the document collections [env: PORTFOLIO_DATA_DIR]"
    )]
    data_dir: Option<PathBuf>,
    #[clap(long, help = "Discord bot token [env: DISCORD_BOT_TOKEN]")]
    discord_token: Option<String>,
    #[clap(
        long,
        help = "Avatar lookup timeout in milliseconds [env: AVATAR_TIMEOUT_MS]"
    )]
    timeout_ms: Option<u64>,
}

impl Serve {
    pub async fn run(&self) -> Result<(), AppError> {
        let config = self.config()?;
        log::debug!("Using data folder {}", config.data_dir.display());
        server::start_server(config).await?;
        Ok(())
    }

    // Flags win over the environment.
    fn config(&self) -> Result<Config, AppError> {
        let mut config =
            Config::load().map_err(|e| AppError::ConfigError(e.to_string()))?;

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(token) = &self.discord_token {
            config.avatar = config.avatar.with_token(Some(token.clone()));
        }
        if let Some(millis) = self.timeout_ms {
            config.avatar =
                config.avatar.with_timeout(Duration::from_millis(millis));
        }
        config.avatar = config
            .avatar
            .validated()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        Ok(config)
    }
}
