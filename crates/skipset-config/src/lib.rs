//! Configuration management and loading for skipset.

use serde::{Deserialize, Serialize};
use skipset_coin::{DEFAULT_SEED, SeededCoin};
use skipset_logging::LoggingConfig;
use std::path::PathBuf;

/// Configuration format types supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    #[default]
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension, defaulting to YAML.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::default(),
        }
    }
}

/// Settings for a skip list set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipSetConfig {
    /// Seed for the level-promotion coin
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Structural event logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for SkipSetConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SkipSetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Build the promotion coin described by this config.
    pub fn coin(&self) -> SeededCoin {
        SeededCoin::new(self.seed)
    }

    pub fn from_json_str(contents: &str) -> anyhow::Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON config: {}", e))
    }

    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse YAML config: {}", e))
    }
}

/// Load configuration from a file
pub fn load_config<P: Into<PathBuf>>(path: P) -> anyhow::Result<SkipSetConfig> {
    let path = path.into();
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;

    match ConfigFormat::from_path(&path) {
        ConfigFormat::Json => SkipSetConfig::from_json_str(&contents),
        ConfigFormat::Yaml => SkipSetConfig::from_yaml_str(&contents),
    }
}

/// Save configuration to a file
pub fn save_config<P: Into<PathBuf>>(config: &SkipSetConfig, path: P) -> anyhow::Result<()> {
    let path = path.into();
    let contents = match ConfigFormat::from_path(&path) {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON config: {}", e))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| anyhow::anyhow!("Failed to serialize YAML config: {}", e))?,
    };

    std::fs::write(&path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipset_coin::CoinFlip;
    use skipset_logging::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn config_default_values() {
        let config = SkipSetConfig::default();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn config_empty_documents_use_defaults() {
        assert_eq!(SkipSetConfig::from_json_str("{}").unwrap(), SkipSetConfig::default());
        assert_eq!(
            SkipSetConfig::from_yaml_str("seed: 9\n").unwrap(),
            SkipSetConfig::default().with_seed(9)
        );
    }

    #[test]
    fn config_nested_logging() {
        let yaml = "seed: 3\nlogging:\n  level: debug\n  capacity: 8\n";
        let config = SkipSetConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.capacity, 8);
    }

    #[test]
    fn config_rejects_malformed_json() {
        let err = SkipSetConfig::from_json_str("{\"seed\": \"x\"}").unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON config"));
    }

    #[test]
    fn config_coin_follows_seed() {
        let config = SkipSetConfig::new().with_seed(11);
        let mut a = config.coin();
        let mut b = SeededCoin::new(11);
        for _ in 0..16 {
            assert_eq!(a.flip(), b.flip());
        }
    }

    #[test]
    fn format_detection() {
        assert_eq!(ConfigFormat::from_path("a.json".as_ref()), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path("a.yml".as_ref()), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path("a.conf".as_ref()), ConfigFormat::Yaml);
    }

    #[test]
    fn load_save_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("skipset.yaml");

        let config = SkipSetConfig::new()
            .with_seed(99)
            .with_logging(LoggingConfig::new().with_level(LogLevel::Trace));

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_save_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("skipset.json");

        let config = SkipSetConfig::default();

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config(temp_dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
