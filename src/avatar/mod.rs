mod live;
mod provider;
pub mod stock;

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use live::LiveAvatar;
pub use provider::{LookupError, ProviderClient, ProviderUser};

use crate::config::AvatarConfig;
use crate::Result;
use stock::{
    custom_avatar_url, is_snowflake, snowflake_index, stock_avatar_url, stock_index,
};

/// Discriminator reported with a stock fallback.
pub const FALLBACK_DISCRIMINATOR: &str = "0000";

/// Avatar shown next to a Discord user.
///
/// Serialized as `{avatarUrl, username, discriminator}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarResult {
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
    #[serde(rename = "username")]
    pub display_name: String,
    pub discriminator: String,
}

/// Resolves Discord user ids to avatars, degrading to stock images.
///
/// Resolution happens in two stages: a fallback computed from the id alone,
/// then at most one provider lookup that replaces it on success.
pub struct AvatarResolver {
    config: AvatarConfig,
    provider: ProviderClient,
}

impl AvatarResolver {
    pub fn new(config: AvatarConfig) -> Result<Self> {
        let provider = ProviderClient::new(&config)?;
        Ok(Self { config, provider })
    }

    /// Stock avatar for `user_id`, no I/O involved.
    pub fn fallback(&self, user_id: &str) -> AvatarResult {
        AvatarResult {
            avatar_url: stock_avatar_url(
                &self.config.cdn_base,
                snowflake_index(user_id),
            ),
            display_name: self.config.placeholder_name.clone(),
            discriminator: FALLBACK_DISCRIMINATOR.to_owned(),
        }
    }

    /// Never fails: any lookup error yields [`Self::fallback`].
    pub async fn resolve(&self, user_id: &str) -> AvatarResult {
        let fallback = self.fallback(user_id);
        match self.lookup(user_id).await {
            Ok(live) => live,
            Err(LookupError::ConfigMissing) => {
                debug!("No credential, stock avatar for {user_id}");
                fallback
            }
            Err(e @ LookupError::InvalidUserId(_)) => {
                debug!("{e}, stock avatar");
                fallback
            }
            Err(e) => {
                warn!("Avatar lookup for {user_id} failed, keeping fallback: {e}");
                fallback
            }
        }
    }

    /// The provider stage on its own, errors included.
    ///
    /// Only plain snowflake ids reach the provider.
    pub async fn lookup(
        &self,
        user_id: &str,
    ) -> std::result::Result<AvatarResult, LookupError> {
        if !is_snowflake(user_id) {
            return Err(LookupError::InvalidUserId(user_id.to_owned()));
        }
        let user = self.provider.fetch_user(user_id).await?;
        Ok(self.from_profile(user_id, user))
    }

    /// Fallback right away, live result later.
    ///
    /// Must be called from within a tokio runtime.
    pub fn resolve_live(self: &Arc<Self>, user_id: impl Into<String>) -> LiveAvatar {
        LiveAvatar::spawn(Arc::clone(self), user_id.into())
    }

    fn from_profile(&self, user_id: &str, user: ProviderUser) -> AvatarResult {
        let cdn = &self.config.cdn_base;
        let avatar_url = match user.avatar.as_deref().filter(|hash| !hash.is_empty()) {
            Some(hash) => custom_avatar_url(cdn, user_id, hash),
            None => stock_avatar_url(cdn, stock_index(&user.discriminator, user_id)),
        };

        AvatarResult {
            avatar_url,
            display_name: user.username,
            discriminator: user.discriminator,
        }
    }
}
