//! Central configuration for the generator.
//!
//! Loads from `config.toml` at the project root.
//! All generation parameters are runtime-configurable — no recompilation needed.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Output sink settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Path of the delimited output file
    #[serde(default = "default_sink_path")]
    pub path: String,
}

fn default_sink_path() -> String {
    "market_data_orders.csv".to_string()
}

/// Market model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Starting price of the random walk
    #[serde(default = "default_base_price")]
    pub base_price: f64,
}

fn default_base_price() -> f64 {
    68480.0
}

/// Batch generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Print the live status line while running
    #[serde(default = "default_live_preview")]
    pub live_preview: bool,
    /// Smallest batch-size target
    #[serde(default = "default_batch_min")]
    pub batch_min: u32,
    /// Largest batch-size target
    #[serde(default = "default_batch_max")]
    pub batch_max: u32,
    /// Probability that a derived level is dropped before shuffling
    #[serde(default = "default_drop_probability")]
    pub drop_probability: f64,
    /// Shortest pause between batches
    #[serde(default = "default_pause_min_ms")]
    pub pause_min_ms: u64,
    /// Longest pause between batches
    #[serde(default = "default_pause_max_ms")]
    pub pause_max_ms: u64,
}

fn default_live_preview() -> bool {
    true
}
fn default_batch_min() -> u32 {
    3
}
fn default_batch_max() -> u32 {
    12
}
fn default_drop_probability() -> f64 {
    0.3
}
fn default_pause_min_ms() -> u64 {
    300
}
fn default_pause_max_ms() -> u64 {
    1500
}

/// Top-level config file structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sink: SinkConfig,
    pub market: MarketConfig,
    pub generator: GeneratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sink: SinkConfig { path: default_sink_path() },
            market: MarketConfig { base_price: default_base_price() },
            generator: GeneratorConfig {
                live_preview: default_live_preview(),
                batch_min: default_batch_min(),
                batch_max: default_batch_max(),
                drop_probability: default_drop_probability(),
                pause_min_ms: default_pause_min_ms(),
                pause_max_ms: default_pause_max_ms(),
            },
        }
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Load from the default location (project root config.toml).
    pub fn load_default() -> Self {
        let candidates = [
            "config.toml",
            concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml"),
        ];

        for path in &candidates {
            if let Ok(cfg) = Self::load(Path::new(path)) {
                tracing::info!("📋 Loaded config from {}", path);
                return cfg;
            }
        }

        tracing::warn!("⚠️ No config.toml found, using defaults");
        Self::default()
    }

    /// Reject settings the run loop cannot honor. A bad config aborts
    /// startup exactly like an unopenable sink.
    pub fn validate(&self) -> Result<()> {
        if self.sink.path.trim().is_empty() {
            return Err(Error::Config("sink.path must not be empty".to_string()));
        }
        if !self.market.base_price.is_finite() || self.market.base_price <= 0.0 {
            return Err(Error::Config(format!(
                "market.base_price must be finite and positive, got {}",
                self.market.base_price
            )));
        }
        if self.generator.batch_min == 0 || self.generator.batch_min > self.generator.batch_max {
            return Err(Error::Config(format!(
                "generator batch range [{}, {}] is empty",
                self.generator.batch_min, self.generator.batch_max
            )));
        }
        if !self.generator.drop_probability.is_finite()
            || !(0.0..1.0).contains(&self.generator.drop_probability)
        {
            return Err(Error::Config(format!(
                "generator.drop_probability must be in [0, 1), got {}",
                self.generator.drop_probability
            )));
        }
        if self.generator.pause_min_ms > self.generator.pause_max_ms {
            return Err(Error::Config(format!(
                "generator pause range [{}, {}] ms is empty",
                self.generator.pause_min_ms, self.generator.pause_max_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = AppConfig::default();
        assert_eq!(config.sink.path, "market_data_orders.csv");
        assert_eq!(config.market.base_price, 68480.0);
        assert!(config.generator.live_preview);
        assert_eq!(config.generator.batch_min, 3);
        assert_eq!(config.generator.batch_max, 12);
        assert_eq!(config.generator.drop_probability, 0.3);
        assert_eq!(config.generator.pause_min_ms, 300);
        assert_eq!(config.generator.pause_max_ms, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_keep_remaining_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [sink]
            path = "out/orders.csv"

            [generator]
            live_preview = false
            drop_probability = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.sink.path, "out/orders.csv");
        assert!(!config.generator.live_preview);
        assert_eq!(config.generator.drop_probability, 0.0);
        assert_eq!(config.market.base_price, 68480.0);
        assert_eq!(config.generator.batch_max, 12);
    }

    #[test]
    fn validate_rejects_bad_settings() {
        let mut config = AppConfig::default();
        config.market.base_price = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.generator.batch_min = 9;
        config.generator.batch_max = 3;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.generator.drop_probability = 1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.generator.pause_min_ms = 2_000;
        config.generator.pause_max_ms = 500;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.sink.path = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
