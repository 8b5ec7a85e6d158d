// File: ./src/config.rs
// Handles ingestion configuration loading, saving, and defaults.
use crate::context::AppContext;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_primary_currency() -> String {
    "USD".to_string()
}
fn default_phase_name() -> String {
    "Implementation".to_string()
}

fn default_task_span_days() -> i64 {
    7
}

fn default_min_duration_weeks() -> u32 {
    4
}
fn default_weeks_per_task() -> f64 {
    0.5
}

fn default_substantial_input_chars() -> usize {
    200
}

fn default_max_description_phases() -> usize {
    5
}

fn default_placeholder_email_domain() -> String {
    "placeholder.local".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct IngestConfig {
    /// Currency assumed when the text carries no foreign symbol or code.
    #[serde(default = "default_primary_currency")]
    pub primary_currency: String,
    /// Name of the phase synthesized for list items with no header.
    #[serde(default = "default_phase_name")]
    pub default_phase_name: String,

    /// Offset between a task's start and its synthetic end date.
    #[serde(default = "default_task_span_days")]
    pub task_span_days: i64,

    #[serde(default = "default_min_duration_weeks")]
    pub min_duration_weeks: u32,
    #[serde(default = "default_weeks_per_task")]
    pub weeks_per_task: f64,

    /// Inputs longer than this are expected to mention a budget.
    #[serde(default = "default_substantial_input_chars")]
    pub substantial_input_chars: usize,

    #[serde(default = "default_max_description_phases")]
    pub max_description_phases: usize,

    #[serde(default = "default_placeholder_email_domain")]
    pub placeholder_email_domain: String,

    #[serde(default = "default_log_level")]
    pub log_level: String, // off, error, warn, info, debug, trace
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            // Match the serde defaults
            primary_currency: "USD".to_string(),
            default_phase_name: "Implementation".to_string(),
            task_span_days: 7,
            min_duration_weeks: 4,
            weeks_per_task: 0.5,
            substantial_input_chars: 200,
            max_description_phases: 5,
            placeholder_email_domain: "placeholder.local".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl IngestConfig {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: IngestConfig = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like [`IngestConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Detects whether an error means the config file was missing, either via
    /// our explicit message or an underlying IO NotFound in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str).map_err(|e| {
            anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e)
        })?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let ctx = TestContext::new();
        let err = IngestConfig::load(&ctx).unwrap_err();
        assert!(IngestConfig::is_missing_config_error(&err));

        let cfg = IngestConfig::load_or_default(&ctx).unwrap();
        assert_eq!(cfg, IngestConfig::default());
    }

    #[test]
    fn test_partial_config_uses_serde_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "primary_currency = \"INR\"\ntask_span_days = 14\n").unwrap();

        let cfg = IngestConfig::load(&ctx).unwrap();
        assert_eq!(cfg.primary_currency, "INR");
        assert_eq!(cfg.task_span_days, 14);
        assert_eq!(cfg.default_phase_name, "Implementation");
        assert_eq!(cfg.min_duration_weeks, 4);
    }

    #[test]
    fn test_save_then_load() {
        let ctx = TestContext::new();
        let cfg = IngestConfig {
            primary_currency: "EUR".to_string(),
            log_level: "debug".to_string(),
            ..IngestConfig::default()
        };
        cfg.save(&ctx).unwrap();

        let loaded = IngestConfig::load(&ctx).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_malformed_config_is_not_missing() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "primary_currency = [").unwrap();

        let err = IngestConfig::load(&ctx).unwrap_err();
        assert!(!IngestConfig::is_missing_config_error(&err));
        assert!(IngestConfig::load_or_default(&ctx).is_err());
    }
}
