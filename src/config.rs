use serde::Deserialize;
use tracing::Level;

use crate::error::ConfigError;
use crate::pipeline::services::RankingMode;

/// Runtime settings. Missing keys fall back to [`Configuration::default`].
///
/// Loaded from an optional `giftbot.toml` in the working directory, then
/// overridden by `GIFTBOT_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub log_level: String,
    pub ranking_mode: String,
    pub default_label_prefix: String,
    pub event_buffer_size: usize,
    pub reply_buffer_size: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ranking_mode: "rainbow".to_string(),
            default_label_prefix: "Gift".to_string(),
            event_buffer_size: 32,
            reply_buffer_size: 32,
        }
    }
}

impl Configuration {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("giftbot")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::with_prefix("GIFTBOT").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn ranking_mode(&self) -> RankingMode {
        RankingMode::parse(&self.ranking_mode)
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}
