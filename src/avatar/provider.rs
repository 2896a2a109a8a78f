use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::stock::UNIFIED_DISCRIMINATOR;
use crate::config::AvatarConfig;
use crate::Result;

const USER_AGENT: &str = "portfolio-avatar (https://github.com/lordx679, 0.1)";

/// Why a live lookup produced nothing.
///
/// None of these reach the caller of [`super::AvatarResolver::resolve`],
/// they all end in the stock avatar.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no identity provider credential configured")]
    ConfigMissing,
    #[error("network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),
    #[error("provider error: {0}")]
    ProviderError(String),
    #[error("not a Discord user id: {0:?}")]
    InvalidUserId(String),
}

/// Profile as returned by `GET /users/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    #[serde(default = "unified_discriminator")]
    pub discriminator: String,
}

fn unified_discriminator() -> String {
    UNIFIED_DISCRIMINATOR.to_owned()
}

pub struct ProviderClient {
    client: reqwest::Client,
    api_base: Url,
    bot_token: Option<String>,
    timeout: Duration,
}

impl ProviderClient {
    pub fn new(config: &AvatarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_base: Url::parse(&config.api_base)?,
            bot_token: config.bot_token.clone(),
            timeout: config.timeout,
        })
    }

    /// Single authenticated profile fetch, bounded by the configured timeout.
    ///
    /// `user_id` is sent as one percent-encoded path segment.
    pub async fn fetch_user(
        &self,
        user_id: &str,
    ) -> std::result::Result<ProviderUser, LookupError> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or(LookupError::ConfigMissing)?;
        let authorization = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| LookupError::ConfigMissing)?;

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LookupError::ProviderError("api base cannot carry a path".to_owned())
            })?
            .pop_if_empty()
            .push("users")
            .push(user_id);
        log::debug!("Fetching profile {url}");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::ProviderError(format!(
                "provider answered {status}"
            )));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Err(LookupError::ProviderError(
                "response is not JSON".to_owned(),
            ));
        }

        let body = response.bytes().await?;
        let user: ProviderUser = serde_json::from_slice(&body).map_err(|e| {
            LookupError::ProviderError(format!("malformed profile: {e}"))
        })?;
        if user.username.trim().is_empty() {
            return Err(LookupError::ProviderError(
                "profile has no username".to_owned(),
            ));
        }

        Ok(user)
    }
}
