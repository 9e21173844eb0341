use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::core::{distance::DistanceUnit, sorting::SortDirection};
use crate::error::{AppError, ErrorPosture};
use crate::models::Coordinate;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub global: GlobalSettings,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Process-wide switches; not overridable per run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalSettings {
    /// Surface unexpected errors verbatim instead of masking them
    #[serde(default)]
    pub show_unhandled_errors: bool,
}

impl GlobalSettings {
    pub fn posture(&self) -> ErrorPosture {
        ErrorPosture::from_show_unhandled(self.show_unhandled_errors)
    }
}

/// Configuration for one pipeline run
///
/// Built once per invocation from the loaded defaults merged with the
/// caller's overrides, then treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
    #[serde(default = "default_source_coordinates")]
    pub source_coordinates: Coordinate,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    /// Inclusive distance threshold, in `distance_unit`
    #[serde(default = "default_distance")]
    pub distance: f64,
    #[validate(length(min = 1))]
    #[serde(default = "default_sorting_field")]
    pub customer_sorting_field: String,
    #[serde(default)]
    pub sorting_type: SortDirection,
    /// Strict mode: abort the run on the first bad line or record
    #[serde(default)]
    pub show_error_for_failed_customer_processing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
            source_coordinates: default_source_coordinates(),
            distance_unit: DistanceUnit::default(),
            distance: default_distance(),
            customer_sorting_field: default_sorting_field(),
            sorting_type: SortDirection::default(),
            show_error_for_failed_customer_processing: false,
        }
    }
}

fn default_file_path() -> PathBuf { PathBuf::from("data/customers.txt") }
fn default_source_coordinates() -> Coordinate { Coordinate::new(53.339428, -6.257664) }
fn default_distance() -> f64 { 100.0 }
fn default_sorting_field() -> String { "user_id".to_string() }

/// Per-call overrides, keyed the way callers pass them (`filePath`,
/// `sortingType`, ...). Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub file_path: Option<PathBuf>,
    pub source_coordinates: Option<Coordinate>,
    pub distance_unit: Option<DistanceUnit>,
    pub distance: Option<f64>,
    pub customer_sorting_field: Option<String>,
    pub sorting_type: Option<SortDirection>,
    pub show_error_for_failed_customer_processing: Option<bool>,
}

impl AppConfig {
    /// Merge caller overrides over this configuration
    ///
    /// `overrides` must be a JSON object. A recognized key with a value of
    /// the wrong shape, or a merged result that fails validation, is an
    /// `InvalidConfiguration` error.
    pub fn with_overrides(&self, overrides: &Value) -> Result<AppConfig, AppError> {
        if !overrides.is_object() {
            return Err(AppError::InvalidConfiguration(format!(
                "expected an object, got `{}`",
                overrides
            )));
        }

        let overrides = ConfigOverrides::deserialize(overrides)
            .map_err(|e| AppError::InvalidConfiguration(e.to_string()))?;

        let merged = self.clone().apply(overrides);
        merged.validated()
    }

    /// Apply already-typed overrides; fields left as `None` keep their value
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(file_path) = overrides.file_path {
            self.file_path = file_path;
        }
        if let Some(source_coordinates) = overrides.source_coordinates {
            self.source_coordinates = source_coordinates;
        }
        if let Some(distance_unit) = overrides.distance_unit {
            self.distance_unit = distance_unit;
        }
        if let Some(distance) = overrides.distance {
            self.distance = distance;
        }
        if let Some(field) = overrides.customer_sorting_field {
            self.customer_sorting_field = field;
        }
        if let Some(sorting_type) = overrides.sorting_type {
            self.sorting_type = sorting_type;
        }
        if let Some(strict) = overrides.show_error_for_failed_customer_processing {
            self.show_error_for_failed_customer_processing = strict;
        }
        self
    }

    pub fn validated(self) -> Result<Self, AppError> {
        self.validate()
            .map_err(|e| AppError::InvalidConfiguration(e.to_string()))?;
        Ok(self)
    }

    pub fn is_strict(&self) -> bool {
        self.show_error_for_failed_customer_processing
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NEARBY__)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered("config", environment())
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_file_with(path.as_ref(), environment())
    }

    /// `default` then `local` from `dir`, then `env`
    fn load_layered(dir: impl AsRef<Path>, env: Environment) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        Config::builder()
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join("local")).required(false))
            // e.g., NEARBY__APP__DISTANCE -> app.distance
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    fn load_file_with(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("NEARBY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
