use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "nws-tools/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration stored on disk.
///
/// The NWS API is unauthenticated, so there are no credentials here;
/// every field has a sensible default and the config file is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the upstream weather API.
    pub base_url: String,

    /// `User-Agent` header sent with every request, as the upstream
    /// API asks callers to identify themselves.
    pub user_agent: String,

    /// Per-request timeout. A request that exceeds it is treated as
    /// failed; there are no retries.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if no file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, run with defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nws-tools", "nws-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_nws_api() {
        let cfg = Config::default();

        assert_eq!(cfg.base_url, "https://api.weather.gov");
        assert_eq!(cfg.user_agent, "nws-tools/0.1");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn empty_toml_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("").expect("empty config must parse");

        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg: Config = toml::from_str(
            r#"
            base_url = "http://localhost:8080"
            timeout_secs = 5
            "#,
        )
        .expect("partial config must parse");

        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let cfg = Config {
            base_url: "http://nws.test".to_string(),
            user_agent: "probe/0.1".to_string(),
            timeout_secs: 12,
        };

        let encoded = toml::to_string_pretty(&cfg).expect("config must serialize");
        let decoded: Config = toml::from_str(&encoded).expect("serialized config must parse");

        assert_eq!(decoded.base_url, cfg.base_url);
        assert_eq!(decoded.user_agent, cfg.user_agent);
        assert_eq!(decoded.timeout_secs, cfg.timeout_secs);
    }
}
