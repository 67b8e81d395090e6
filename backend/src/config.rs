use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const CONFIG_PATH_ENV: &str = "LIQUIDVISION_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/liquidvision.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid URL for {field}: {source}")]
    Url {
        field: &'static str,
        source: url::ParseError,
    },
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub classifier: ClassifierConfig,
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub neutral_band: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9001/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9002/".to_string(),
            timeout_secs: 10,
            neutral_band: 0.1,
        }
    }
}

impl AppConfig {
    /// Reads the YAML file named by `LIQUIDVISION_CONFIG` (or the default
    /// path), then applies `PORT`, `CLASSIFIER_URL` and `SENTIMENT_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Invalid {
                field: "PORT",
                reason: format!("{port:?} is not a port number"),
            })?;
        }
        if let Some(url) = lookup("CLASSIFIER_URL") {
            self.classifier.base_url = url;
        }
        if let Some(url) = lookup("SENTIMENT_URL") {
            self.sentiment.base_url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.url()?;
        self.sentiment.url()?;

        if self.classifier.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "classifier.timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.sentiment.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "sentiment.timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if !(0.0..1.0).contains(&self.sentiment.neutral_band) {
            return Err(ConfigError::Invalid {
                field: "sentiment.neutral_band",
                reason: format!("{} is outside [0, 1)", self.sentiment.neutral_band),
            });
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "server.max_upload_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ClassifierConfig {
    pub fn url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::Url {
            field: "classifier.base_url",
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SentimentConfig {
    pub fn url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::Url {
            field: "sentiment.base_url",
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
