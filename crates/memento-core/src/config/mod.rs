//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Memento configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name: "hashing" or "none"
    pub provider: String,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_top_k: usize,
    /// Queries shown in the report's search section
    pub example_queries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            model: "hashing-64".to_string(),
            dimension: 64,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: 3,
            example_queries: vec![
                "What does the user care about?".to_string(),
                "User's communication style".to_string(),
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

const KEYS: [&str; 6] = [
    "embedding.provider",
    "embedding.model",
    "embedding.dimension",
    "search.default_top_k",
    "search.example_queries",
    "output.directory",
];

const PROVIDERS: [&str; 2] = ["hashing", "none"];

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("MEMENTO_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("memento")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults,
    /// then apply `MEMENTO_*` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Apply `MEMENTO_EMBEDDING_*` environment variables on top of file values
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(provider) = env::var("MEMENTO_EMBEDDING_PROVIDER") {
            self.set("embedding.provider", &provider)?;
        }
        if let Ok(model) = env::var("MEMENTO_EMBEDDING_MODEL") {
            self.set("embedding.model", &model)?;
        }
        if let Ok(dimension) = env::var("MEMENTO_EMBEDDING_DIMENSION") {
            self.set("embedding.dimension", &dimension)?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(anyhow!(
                "Invalid embedding provider: {}. Valid options: {}",
                self.embedding.provider,
                PROVIDERS.join(", ")
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(anyhow!("Embedding dimension must be greater than 0"));
        }
        if self.search.default_top_k == 0 {
            return Err(anyhow!("search.default_top_k must be greater than 0"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "embedding.provider" => Ok(self.embedding.provider.clone()),
            "embedding.model" => Ok(self.embedding.model.clone()),
            "embedding.dimension" => Ok(self.embedding.dimension.to_string()),
            "search.default_top_k" => Ok(self.search.default_top_k.to_string()),
            "search.example_queries" => Ok(self.search.example_queries.join(" | ")),
            "output.directory" => Ok(self.output.directory.clone()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `memento config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "embedding.provider" => {
                if !PROVIDERS.contains(&value) {
                    return Err(anyhow!(
                        "Invalid embedding provider: {}. Valid options: {}",
                        value,
                        PROVIDERS.join(", ")
                    ));
                }
                self.embedding.provider = value.to_string();
            }
            "embedding.model" => {
                self.embedding.model = value.to_string();
            }
            "embedding.dimension" => {
                let dimension: usize = value
                    .parse()
                    .with_context(|| format!("Invalid dimension value: {}", value))?;
                if dimension == 0 {
                    return Err(anyhow!("Embedding dimension must be greater than 0"));
                }
                self.embedding.dimension = dimension;
            }
            "search.default_top_k" => {
                let top_k: usize = value
                    .parse()
                    .with_context(|| format!("Invalid default_top_k value: {}", value))?;
                if top_k == 0 {
                    return Err(anyhow!("search.default_top_k must be greater than 0"));
                }
                self.search.default_top_k = top_k;
            }
            "search.example_queries" => {
                self.search.example_queries = value
                    .split('|')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "output.directory" => {
                self.output.directory = value.to_string();
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `memento config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        KEYS.iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.embedding.provider, "hashing");
        assert_eq!(config.search.default_top_k, 3);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("embedding.dimension", "128").unwrap();
        config.set("search.example_queries", "design | tooling").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.embedding.dimension, 128);
        assert_eq!(loaded.search.example_queries, vec!["design", "tooling"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\ndirectory = \"out\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.output.directory, "out");
        assert_eq!(loaded.embedding, EmbeddingConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[embedding]\nprovider = \"cloud\"\nmodel = \"x\"\ndimension = 8\n",
        )
        .unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("cloud"));
    }

    #[test]
    fn test_set_validation() {
        let mut config = Config::default();
        assert!(config.set("embedding.provider", "cloud").is_err());
        assert!(config.set("embedding.dimension", "0").is_err());
        assert!(config.set("embedding.dimension", "abc").is_err());
        assert!(config.set("search.default_top_k", "0").is_err());
        assert!(config.set("unknown.key", "1").is_err());

        config.set("embedding.provider", "none").unwrap();
        assert_eq!(config.get("embedding.provider").unwrap(), "none");
    }

    #[test]
    fn test_list_covers_every_key() {
        let config = Config::default();
        let listed = config.list().unwrap();
        assert_eq!(listed.len(), KEYS.len());
        assert!(listed.iter().any(|(k, v)| k == "embedding.model" && v == "hashing-64"));
    }
}
