//! Runtime configuration for the chat engine.
//!
//! Values come from `APPLECHAT_*` environment variables (optionally seeded from a
//! `.env` file) and fall back to the defaults the preprocessing and training scripts
//! produce artifacts for.

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

/// Tunables for loading artifacts and answering questions.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatConfig {
    /// Processed dataset export (JSON records or pipeline envelope).
    pub dataset_path: PathBuf,
    /// Model metrics summary written by the training script.
    pub metrics_path: PathBuf,
    /// Number of leading rows inspected when deciding whether a column is numeric.
    #[validate(range(min = 1, max = 10000))]
    pub numeric_sample_size: usize,
    /// Share of sampled values that must parse as numbers for a numeric column.
    #[validate(range(min = 0.0, max = 1.0))]
    pub numeric_ratio: f64,
    /// Minimum similarity for the statistical matcher to answer on its own.
    #[validate(range(min = 0.0, max = 1.0))]
    pub matcher_threshold: f32,
    /// Whether the statistical matcher tier is trained and consulted.
    pub matcher_enabled: bool,
    /// Decimal places used when displaying numbers.
    #[validate(range(min = 0, max = 10))]
    pub decimal_places: u32,
    /// Matching rows listed under a filter answer.
    #[validate(range(min = 1, max = 100))]
    pub filter_sample_limit: usize,
    /// Row count for top-n questions that do not name one.
    #[validate(range(min = 1, max = 1000))]
    pub default_top_n: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let resources = PortablePathManager::resources_dir();
        Self::with_resources_dir(resources)
    }
}

impl ChatConfig {
    /// Defaults with artifact paths rooted at `resources`.
    pub fn with_resources_dir(resources: PathBuf) -> Self {
        Self {
            dataset_path: PortablePathManager::dataset_file(&resources),
            metrics_path: PortablePathManager::metrics_file(&resources),
            numeric_sample_size: 30,
            numeric_ratio: 0.6,
            matcher_threshold: 0.75,
            matcher_enabled: true,
            decimal_places: 3,
            filter_sample_limit: 6,
            default_top_n: 5,
        }
    }

    /// Loads `.env` (if any) and then reads the configuration from the environment.
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Reads the configuration from the process environment only.
    pub fn from_env() -> Result<Self, AppError> {
        let resources = env::var("APPLECHAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PortablePathManager::resources_dir());
        let mut config = Self::with_resources_dir(resources);

        if let Ok(path) = env::var("APPLECHAT_DATASET") {
            config.dataset_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("APPLECHAT_METRICS") {
            config.metrics_path = PathBuf::from(path);
        }
        if let Some(v) = parse_var("APPLECHAT_NUMERIC_SAMPLE")? {
            config.numeric_sample_size = v;
        }
        if let Some(v) = parse_var("APPLECHAT_NUMERIC_RATIO")? {
            config.numeric_ratio = v;
        }
        if let Some(v) = parse_var("APPLECHAT_MATCHER_THRESHOLD")? {
            config.matcher_threshold = v;
        }
        if let Ok(raw) = env::var("APPLECHAT_MATCHER") {
            config.matcher_enabled = parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("APPLECHAT_MATCHER={:?}: expected a boolean", raw))
            })?;
        }
        if let Some(v) = parse_var("APPLECHAT_DECIMALS")? {
            config.decimal_places = v;
        }
        if let Some(v) = parse_var("APPLECHAT_FILTER_SAMPLE")? {
            config.filter_sample_limit = v;
        }
        if let Some(v) = parse_var("APPLECHAT_TOP_N")? {
            config.default_top_n = v;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Boolean switch as written in env files: `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}
