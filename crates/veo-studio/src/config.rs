use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "veo-2.0-generate-001";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Runtime settings for talking to the Veo endpoints.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub poll_interval: Duration,
    /// `None` polls until the remote operation finishes.
    pub max_polls: Option<u32>,
    pub person_generation: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
            person_generation: None,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// The API key is mandatory; everything else falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = ["GEMINI_API_KEY", "API_KEY"]
            .into_iter()
            .filter_map(|name| lookup(name))
            .find(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key.trim());

        if let Some(model) = lookup("VEO_MODEL").filter(|v| !v.is_empty()) {
            config.model = model;
        }
        if let Some(base_url) = lookup("VEO_BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Some(value) = lookup("VEO_POLL_INTERVAL_SECS") {
            config.poll_interval = Duration::from_secs(parse_number("VEO_POLL_INTERVAL_SECS", value)?);
        }
        if let Some(value) = lookup("VEO_MAX_POLLS") {
            config.max_polls = Some(parse_number("VEO_MAX_POLLS", value)?);
        }
        config.person_generation = lookup("VEO_PERSON_GENERATION").filter(|v| !v.is_empty());

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
