use reqwest::Url;
use std::env;
use std::time::Duration;

/// Store client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the workout store, e.g. `http://localhost:8000`
    pub base_url: Url,
    /// Bearer token attached to every request
    pub token: Option<String>,
    /// Per-request deadline; none by default
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for a store at `base_url`, without token or timeout
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("{} cannot be used as a base URL", base_url);
        }

        Ok(Self {
            base_url,
            token: None,
            timeout: None,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url =
            env::var("WORKOUT_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let mut config = Self::new(&base_url)?;

        config.token = env::var("WORKOUT_API_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = match env::var("WORKOUT_API_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(secs.parse()?)),
            Err(_) => None,
        };

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_urls() {
        assert!(ClientConfig::new("not a url").is_err());
        assert!(ClientConfig::new("mailto:coach@example.com").is_err());

        let config = ClientConfig::new("http://localhost:8000/api")
            .unwrap()
            .with_token("secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url.path(), "/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
    }
}
