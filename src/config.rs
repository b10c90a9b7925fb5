use crate::defaults;
use crate::error::{LongscribeError, Result};
use crate::pipeline::JobConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub chunking: ChunkingConfig,
    pub audio: AudioConfig,
}

/// External model configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub name: String,
    pub transcribe_temperature: f32,
    pub analysis_temperature: f32,
}

/// Chunk segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_secs: f64,
    pub overlap_secs: f64,
}

/// Audio normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: defaults::DEFAULT_MODEL.to_string(),
            transcribe_temperature: defaults::TRANSCRIBE_TEMPERATURE,
            analysis_temperature: defaults::ANALYSIS_TEMPERATURE,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_secs: defaults::CHUNK_SECS,
            overlap_secs: defaults::OVERLAP_SECS,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only falls back to defaults when the file is missing; invalid TOML
    /// is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LONGSCRIBE_API_KEY → model.api_key
    /// - LONGSCRIBE_MODEL → model.name
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("LONGSCRIBE_API_KEY")
            && !key.is_empty()
        {
            self.model.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("LONGSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.model.name = model;
        }
        self
    }

    /// Default config file location: `~/.config/longscribe/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("longscribe")
            .join("config.toml")
    }

    /// Check value ranges before a job starts.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_secs <= 0.0 {
            return Err(LongscribeError::ConfigInvalidValue {
                key: "chunking.chunk_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.chunking.overlap_secs <= 0.0 {
            return Err(LongscribeError::ConfigInvalidValue {
                key: "chunking.overlap_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.chunking.overlap_secs >= self.chunking.chunk_secs {
            return Err(LongscribeError::ConfigInvalidValue {
                key: "chunking.overlap_secs".to_string(),
                message: "must be shorter than chunking.chunk_secs".to_string(),
            });
        }
        if self.audio.sample_rate == 0 {
            return Err(LongscribeError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Pipeline parameters derived from this configuration.
    pub fn job_config(&self) -> JobConfig {
        JobConfig {
            chunk_secs: self.chunking.chunk_secs,
            overlap_secs: self.chunking.overlap_secs,
            sample_rate: self.audio.sample_rate,
            min_marker_spacing_secs: defaults::MIN_MARKER_SPACING_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_has_documented_values() {
        let config = Config::default();

        assert_eq!(config.model.name, "gemini-3-flash-preview");
        assert_eq!(config.model.api_key, None);
        assert_eq!(config.chunking.chunk_secs, 540.0);
        assert_eq!(config.chunking.overlap_secs, 20.0);
        assert_eq!(config.audio.sample_rate, 16000);
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn load_parses_partial_toml_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[chunking]\nchunk_secs = 300.0\n\n[model]\napi_key = \"k\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.chunking.chunk_secs, 300.0);
        assert_eq!(config.chunking.overlap_secs, 20.0); // default preserved
        assert_eq!(config.model.api_key.as_deref(), Some("k"));
        assert_eq!(config.model.name, "gemini-3-flash-preview");
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chunking = nonsense =").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn load_or_default_returns_defaults_for_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/longscribe.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_or_default_propagates_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[").unwrap();

        assert!(Config::load_or_default(file.path()).is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.model.api_key = Some("secret".to_string());
        config.chunking.chunk_secs = 120.0;

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn validate_rejects_bad_chunking() {
        let mut config = Config::default();
        config.chunking.overlap_secs = 540.0;

        match config.validate() {
            Err(LongscribeError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "chunking.overlap_secs");
            }
            other => panic!("expected ConfigInvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_zero_sample_rate() {
        let mut config = Config::default();
        config.audio.sample_rate = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn job_config_mirrors_chunking_settings() {
        let mut config = Config::default();
        config.chunking.chunk_secs = 300.0;
        config.chunking.overlap_secs = 15.0;

        let job = config.job_config();
        assert_eq!(job.chunk_secs, 300.0);
        assert_eq!(job.overlap_secs, 15.0);
        assert_eq!(job.sample_rate, 16000);
    }

    #[test]
    fn default_path_ends_with_crate_config() {
        let path = Config::default_path();
        assert!(path.ends_with("longscribe/config.toml"));
    }
}
