//! Application configuration for examdeck.
//!
//! User config lives at `~/.examdeck/examdeck.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExamdeckError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "examdeck.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".examdeck";

// ---------------------------------------------------------------------------
// Config structs (matching examdeck.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Leaderboard storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Path to the extracted exam document (plain text).
    #[serde(default = "default_document")]
    pub document: String,

    /// Maximum number of questions drawn per exam.
    #[serde(default = "default_question_cap")]
    pub question_cap: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            question_cap: default_question_cap(),
        }
    }
}

fn default_document() -> String {
    "exam.txt".into()
}
fn default_question_cap() -> usize {
    50
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3400
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the leaderboard database. `~` expands to the home directory.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "~/.examdeck/examdeck.db".into()
}

impl StorageConfig {
    /// Resolve the db path, expanding a leading `~` to the home directory.
    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            let home = dirs::home_dir()
                .ok_or_else(|| ExamdeckError::config("could not determine home directory"))?;
            return Ok(home.join(rest));
        }
        Ok(PathBuf::from(&self.db_path))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.examdeck/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ExamdeckError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.examdeck/examdeck.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ExamdeckError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ExamdeckError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ExamdeckError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ExamdeckError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ExamdeckError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("question_cap"));
        assert!(toml_str.contains("db_path"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.question_cap, 50);
        assert_eq!(parsed.server.port, 3400);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = "[server]\nport = 8080\n";
        let parsed: AppConfig = toml::from_str(toml_str).expect("deserialize");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.defaults.question_cap, 50);
    }

    #[test]
    fn db_path_without_tilde_passes_through() {
        let storage = StorageConfig {
            db_path: "/var/lib/examdeck/scores.db".into(),
        };
        let path = storage.resolved_db_path().expect("resolve");
        assert_eq!(path, PathBuf::from("/var/lib/examdeck/scores.db"));
    }
}
