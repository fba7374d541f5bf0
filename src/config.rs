use chrono::Offset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "classifier.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Model file not found at {}. Set model_path in {}", .0.display(), DEFAULT_CONFIG_FILE)]
    ModelMissing(PathBuf),
}

/// Memory layout of the tensor handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// Batch, height, width, channel. What a Keras export expects.
    Nhwc,
    Nchw,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub input_size: (u32, u32),
    pub tensor_layout: TensorLayout,
    pub num_classes: usize,
    pub inference_timeout: Duration,
    pub tick_rate: Duration,
    pub preview_size: u32,
    pub loader_fill_duration: Duration,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/best.onnx"),
            input_size: (224, 224),
            tensor_layout: TensorLayout::Nhwc,
            num_classes: 4,
            inference_timeout: Duration::from_secs(30),
            tick_rate: Duration::from_millis(50),
            preview_size: 250,
            loader_fill_duration: Duration::from_secs(1),
            logger_timezone: utc(),
        }
    }
}

/// On-disk shape of the config. Every key is optional and falls back to
/// `Config::default()`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    model_path: Option<PathBuf>,
    input_width: Option<u32>,
    input_height: Option<u32>,
    tensor_layout: Option<TensorLayout>,
    inference_timeout_ms: Option<u64>,
    tick_rate_ms: Option<u64>,
    preview_size: Option<u32>,
    logger_utc_offset_hours: Option<i32>,
}

impl Config {
    /// Resolves the config the way startup does: an explicit path wins, then
    /// `classifier.toml` in the working directory, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        // Relative model paths are relative to the config file, not the cwd.
        match (config.model_path.is_relative(), path.parent()) {
            (true, Some(dir)) if !dir.as_os_str().is_empty() => Ok(Self {
                model_path: dir.join(&config.model_path),
                ..config
            }),
            _ => Ok(config),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        let defaults = Self::default();

        let input_size = (
            file.input_width.unwrap_or(defaults.input_size.0),
            file.input_height.unwrap_or(defaults.input_size.1),
        );
        if input_size.0 == 0 || input_size.1 == 0 {
            return Err(ConfigError::Invalid {
                key: "input_width/input_height",
                reason: "must be greater than zero".to_string(),
            });
        }

        let inference_timeout = match file.inference_timeout_ms {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "inference_timeout_ms",
                    reason: "must be greater than zero".to_string(),
                })
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.inference_timeout,
        };

        let logger_timezone = match file.logger_utc_offset_hours {
            Some(hours) => chrono::FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
                ConfigError::Invalid {
                    key: "logger_utc_offset_hours",
                    reason: format!("{} is out of range", hours),
                }
            })?,
            None => defaults.logger_timezone,
        };

        Ok(Self {
            model_path: file.model_path.unwrap_or(defaults.model_path),
            input_size,
            tensor_layout: file.tensor_layout.unwrap_or(defaults.tensor_layout),
            num_classes: defaults.num_classes,
            inference_timeout,
            tick_rate: file
                .tick_rate_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_rate),
            preview_size: file.preview_size.unwrap_or(defaults.preview_size),
            loader_fill_duration: defaults.loader_fill_duration,
            logger_timezone,
        })
    }

    pub fn ensure_model_exists(&self) -> Result<(), ConfigError> {
        if self.model_path.is_file() {
            Ok(())
        } else {
            Err(ConfigError::ModelMissing(self.model_path.clone()))
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
