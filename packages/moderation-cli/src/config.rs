use anyhow::{Context, Result};
use conference_api::ConferenceApiClient;
use dotenvy::dotenv;
use moderation::{CommentPolicy, ModerationConfig};
use std::env;
use std::time::Duration;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub moderation: ModerationConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = ModerationConfig::default();

        let comment_policy = match env::var("MODERATION_COMMENT_POLICY") {
            Ok(raw) => raw
                .parse::<CommentPolicy>()
                .map_err(anyhow::Error::msg)
                .context("MODERATION_COMMENT_POLICY must be 'rejected' or 'always'")?,
            Err(_) => defaults.comment_policy,
        };

        let moderation = ModerationConfig::new()
            .with_list_timeout(secs_var("MODERATION_LIST_TIMEOUT_SECS", defaults.list_timeout)?)
            .with_detail_timeout(secs_var(
                "MODERATION_DETAIL_TIMEOUT_SECS",
                defaults.detail_timeout,
            )?)
            .with_update_timeout(secs_var(
                "MODERATION_UPDATE_TIMEOUT_SECS",
                defaults.update_timeout,
            )?)
            .with_comment_policy(comment_policy);

        Ok(Self {
            api_url: env::var("CONFERENCE_API_URL").context("CONFERENCE_API_URL must be set")?,
            api_token: env::var("CONFERENCE_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            moderation,
        })
    }

    /// HTTP client for the three backend services.
    ///
    /// The client's own timeout is the widest pipeline budget; each call is
    /// bounded more tightly by the pipeline.
    pub fn api_client(&self) -> ConferenceApiClient {
        let widest = self
            .moderation
            .list_timeout
            .max(self.moderation.detail_timeout)
            .max(self.moderation.update_timeout);

        let client = ConferenceApiClient::new(&self.api_url).with_timeout(widest);
        match &self.api_token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }
}

fn secs_var(name: &str, default: Duration) -> Result<Duration> {
    match env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{name} must be a whole number of seconds"))?;
            anyhow::ensure!(secs > 0, "{name} must be greater than zero");
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
