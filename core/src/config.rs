//! Client construction settings.

use std::env;
use std::time::Duration;

use crate::session::DEFAULT_BASE_URL;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_API_URL: &str = "PROPOSALPAGE_API_URL";
const ENV_TOKEN: &str = "PROPOSALPAGE_TOKEN";
const ENV_TIMEOUT_SECS: &str = "PROPOSALPAGE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Applied by the default transport to the whole round-trip.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `PROPOSALPAGE_API_URL`, `PROPOSALPAGE_TOKEN`
    /// and `PROPOSALPAGE_TIMEOUT_SECS`. Empty or unparseable values are
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            base_url: non_empty(ENV_API_URL).unwrap_or(defaults.base_url),
            token: non_empty(ENV_TOKEN),
            timeout: non_empty(ENV_TIMEOUT_SECS)
                .and_then(|secs| secs.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
