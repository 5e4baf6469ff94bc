/// Application configuration for TrackChat
///
/// TOML-backed configuration with a process-wide cell. Load once at
/// startup with load_config(); read everywhere else through with_config()
/// or get_config_clone(). A missing file is replaced by written defaults
/// so a fresh install starts with a documented config on disk.
use crate::logger::{self, LogTag};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;

static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub backend: BackendConfig,
    pub cache: CacheTtlConfig,
    pub chat: ChatConfig,
}

/// Music provider API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Backend auth/chat service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Per-endpoint cache time-to-live table, in milliseconds
///
/// Entries are stale strictly after the TTL elapses; a read at exactly
/// the TTL boundary is still served from cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    pub recently_played_ms: u64,
    pub top_tracks_ms: u64,
    pub track_ms: u64,
    pub search_ms: u64,
    pub profile_ms: u64,
}

/// Chat behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub default_agent: String,
    pub max_history_turns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                base_url: "https://api.music.example.com/v1".to_string(),
                timeout_seconds: 30,
            },
            backend: BackendConfig {
                base_url: "https://backend.trackchat.example.com".to_string(),
                timeout_seconds: 30,
            },
            cache: CacheTtlConfig {
                recently_played_ms: 60_000,   // 1 minute
                top_tracks_ms: 300_000,       // 5 minutes
                track_ms: 3_600_000,          // 1 hour, track metadata rarely changes
                search_ms: 120_000,           // 2 minutes
                profile_ms: 600_000,          // 10 minutes
            },
            chat: ChatConfig {
                default_agent: "historian".to_string(),
                max_history_turns: 20,
            },
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.provider.base_url.is_empty() {
            anyhow::bail!("provider.base_url is required in config");
        }
        if self.backend.base_url.is_empty() {
            anyhow::bail!("backend.base_url is required in config");
        }
        if self.provider.timeout_seconds == 0 || self.backend.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than zero");
        }
        Ok(())
    }
}

/// Load configuration from disk into the global cell
///
/// Writes defaults when the file does not exist yet. Safe to call once;
/// later calls replace the in-memory configuration.
pub fn load_config(path: &Path) -> Result<()> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
    } else {
        let default_config = Config::default();
        save_to_path(&default_config, path)?;
        logger::info(
            LogTag::Config,
            &format!("Wrote default config to {}", path.display()),
        );
        default_config
    };

    config.validate()?;

    match CONFIG.get() {
        Some(cell) => {
            if let Ok(mut current) = cell.write() {
                *current = config;
            }
        }
        None => {
            let _ = CONFIG.set(RwLock::new(config));
        }
    }

    Ok(())
}

fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

/// Run a closure against the current configuration
///
/// Falls back to defaults when load_config() has not run (tests, tools).
pub fn with_config<T>(f: impl FnOnce(&Config) -> T) -> T {
    match CONFIG.get() {
        Some(cell) => match cell.read() {
            Ok(config) => f(&config),
            Err(_) => f(&Config::default()),
        },
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
///
/// Useful when config values must be held across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.top_tracks_ms, 300_000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();

        assert_eq!(back.provider.base_url, config.provider.base_url);
        assert_eq!(back.cache.recently_played_ms, config.cache.recently_played_ms);
        assert_eq!(back.chat.default_agent, config.chat.default_agent);
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut config = Config::default();
        config.provider.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_writes_defaults_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        load_config(&path).unwrap();

        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("recently_played_ms"));
    }
}
