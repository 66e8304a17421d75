//! Runtime settings for the page layer.
//!
//! Durations are written the human way (`300ms`, `1s`) when loaded from JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const BACKEND_URL_ENV: &str = "AW_BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL the search endpoint is resolved against
    pub backend_url: Url,
    /// Quiet period before a search is dispatched
    #[serde(with = "human_duration")]
    pub debounce: Duration,
    /// Shorter (trimmed) queries clear the results instead of searching
    pub min_query_len: usize,
    pub words_per_minute: usize,
    /// Animation delay added per article card
    #[serde(with = "human_duration")]
    pub stagger_step: Duration,
    /// Locale used for long dates, e.g. `en_US` or `fr_FR`
    pub locale: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            words_per_minute: 200,
            stagger_step: Duration::from_millis(100),
            locale: "en_US".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the backend taken from `AW_BACKEND_URL` when set.
    pub fn from_env() -> Result<Self> {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new().with_url(url.trim()),
            _ => Ok(Self::new()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_url(mut self, url: &str) -> Result<Self> {
        self.backend_url = Url::parse(url)?;
        Ok(self)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            return Err(Error::Config("words_per_minute must be greater than zero".to_string()));
        }
        if self.backend_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "backend URL cannot be used as a base: {}",
                self.backend_url
            )));
        }
        Ok(())
    }
}

mod human_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
