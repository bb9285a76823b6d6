use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

const ENV_PREFIX: &str = "ROOM_INSIGHT";

/// Service-level configuration for the batch runner and the tower service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub worker_concurrency: usize,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub analyzer: AnalyzerConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            worker_concurrency: 4,
            request_timeout_ms: 10_000,
            log_level: "info".to_string(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Configuration {
    /// Loads defaults, then the optional file, then `ROOM_INSIGHT__*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let configuration: Configuration = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.worker_concurrency == 0 {
            return Err(AppError::InvalidConfig(
                "worker_concurrency must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(AppError::InvalidConfig(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        self.max_log_level()?;
        self.analyzer
            .validate()
            .map_err(AppError::InvalidConfig)
    }

    pub fn max_log_level(&self) -> Result<Level, AppError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| AppError::InvalidConfig(format!("unknown log level '{}'", self.log_level)))
    }
}

/// Tunable thresholds of the analysis orchestrator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// When false the pixel extractor is skipped, as on a host without an image decoder.
    pub pixel_decoding: bool,
    pub observation_confidence_threshold: f64,
    pub lighting_influence_threshold: f64,
    pub ambience_influence_threshold: f64,
    pub max_spatial_recommendations: usize,
    /// Minimum relevance score for detected objects to count as fitting the room
    pub relevance_threshold: f64,
    pub templates_path: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pixel_decoding: true,
            observation_confidence_threshold: 40.0,
            lighting_influence_threshold: 60.0,
            ambience_influence_threshold: 50.0,
            max_spatial_recommendations: 3,
            relevance_threshold: 70.0,
            templates_path: None,
        }
    }
}

impl AnalyzerConfig {
    /// Configuration for hosts that cannot decode pixels
    pub fn heuristic_only() -> Self {
        Self {
            pixel_decoding: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let thresholds = [
            ("observation_confidence_threshold", self.observation_confidence_threshold),
            ("lighting_influence_threshold", self.lighting_influence_threshold),
            ("ambience_influence_threshold", self.ambience_influence_threshold),
            ("relevance_threshold", self.relevance_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100, got {}", name, value));
            }
        }

        if self.max_spatial_recommendations == 0 {
            return Err("max_spatial_recommendations must be greater than 0".to_string());
        }

        Ok(())
    }
}
