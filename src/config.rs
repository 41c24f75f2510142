use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the GitLab personal access token.
pub const TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Optional per-directory config file.
pub const CONFIG_FILE: &str = ".gitlab-mr-review.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .gitlab-mr-review.toml.
/// Every field is optional; both tools work with no file at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitLabConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitLabConfig {
    /// Personal access token with `api` scope. If None, falls back to GITLAB_TOKEN.
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from .gitlab-mr-review.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the token: a non-empty config file value takes precedence,
    /// then a non-empty GITLAB_TOKEN.
    pub fn gitlab_token(&self) -> Option<String> {
        self.gitlab
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()))
    }
}
