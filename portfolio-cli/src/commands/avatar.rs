use std::sync::Arc;

use portfolio::{AvatarConfig, AvatarResolver, AvatarResult};

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "avatar",
    about = "Resolve the avatar of a Discord user, printing the fallback first"
)]
pub struct Avatar {
    #[clap(help = "Discord user id")]
    user_id: String,
    #[clap(
        long,
        help = "Print only the fallback, never contact Discord"
    )]
    offline: bool,
}

impl Avatar {
    pub async fn run(&self) -> Result<(), AppError> {
        let mut config = AvatarConfig::load()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        if self.offline {
            config = config.with_token(None);
        }

        let resolver = Arc::new(AvatarResolver::new(config)?);
        let mut live = resolver.resolve_live(self.user_id.trim());
        print(&live.current())?;

        if let Some(update) = live.changed().await {
            print(&update)?;
        }
        Ok(())
    }
}

fn print(result: &AvatarResult) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
