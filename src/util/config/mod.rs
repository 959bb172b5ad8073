//! structogram configuration system
//!
//! Persists the parser preferences (configurable keyword slots and the
//! case-sensitivity switch) between sessions.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high -> low):
//! 1. Values set through the keyword service at runtime
//! 2. User-level (~/.config/structogram/config.toml)
//! 3. Built-in defaults
//! ```
//!
//! # Usage
//!
//! ```rust
//! use structogram::util::config::{load_user_config, UserConfig};
//!
//! // Load user-level config (defaults if not present)
//! let config = load_user_config().unwrap();
//! assert_eq!(config.parser.keyword("preFor"), Some("for"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User-level configuration for structogram
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Parser preferences (keyword slots, case handling)
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Parser preferences: the configurable keyword slots plus the global
/// case-sensitivity switch for keyword and identifier matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Whether keyword matching ignores upper/lower case
    #[serde(default = "default_ignore_case")]
    pub ignore_case: bool,
    /// Keyword slot values, keyed by the symbolic slot name ("preFor", ...)
    #[serde(default = "default_keywords")]
    pub keywords: IndexMap<String, String>,
}

fn default_ignore_case() -> bool {
    true
}

/// The fixed slot set with its built-in (English) keyword defaults.
/// Alternative/case decorations default to empty, i.e. unused.
pub fn default_keywords() -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    for (slot, word) in [
        ("preAlt", ""),
        ("postAlt", ""),
        ("preCase", ""),
        ("postCase", ""),
        ("preFor", "for"),
        ("postFor", "to"),
        ("stepFor", "by"),
        ("preForIn", "foreach"),
        ("postForIn", "in"),
        ("preWhile", "while"),
        ("postWhile", ""),
        ("preRepeat", "until"),
        ("postRepeat", ""),
        ("preLeave", "leave"),
        ("preReturn", "return"),
        ("preExit", "exit"),
        ("preThrow", "throw"),
        ("input", "INPUT"),
        ("output", "OUTPUT"),
    ] {
        map.insert(slot.to_string(), word.to_string());
    }
    map
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            keywords: default_keywords(),
        }
    }
}

impl ParserConfig {
    /// Look up a keyword slot value
    pub fn keyword(&self, slot: &str) -> Option<&str> {
        self.keywords.get(slot).map(String::as_str)
    }

    /// Set a keyword slot value; unknown slots are rejected
    pub fn set_keyword(&mut self, slot: &str, word: &str) -> bool {
        match self.keywords.get_mut(slot) {
            Some(value) => {
                *value = word.to_string();
                true
            }
            None => false,
        }
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    // Try XDG config directory on Unix
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("structogram"));
    }

    // Fallback to ~/.config/structogram
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("structogram"));
    }

    // On Windows, try %APPDATA%
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("structogram"));
    }

    None
}

/// Get the user config file path (~/.config/structogram/config.toml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Check if user config exists
pub fn config_exists() -> bool {
    get_config_path().map(|p| p.exists()).unwrap_or(false)
}

/// Load user-level configuration
/// Returns default config if file doesn't exist
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    let path = match get_config_path() {
        Some(p) => p,
        None => return Ok(UserConfig::default()),
    };

    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(ConfigError::Io)?;

    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load user-level config, creating default if not exists
pub fn load_or_create_user_config() -> Result<UserConfig, ConfigError> {
    let path = match get_config_path() {
        Some(p) => p,
        None => return Ok(UserConfig::default()),
    };

    if !path.exists() {
        let config = UserConfig::default();
        save_user_config(&config)?;
        return Ok(config);
    }

    load_user_config()
}

/// Save user-level configuration
pub fn save_user_config(config: &UserConfig) -> Result<(), ConfigError> {
    let dir = get_config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(ConfigError::Io)?;
    }

    let content = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    fs::write(&path, content).map_err(ConfigError::Io)?;

    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Cannot determine config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        let config = ParserConfig::default();
        assert_eq!(config.keyword("preFor"), Some("for"));
        assert_eq!(config.keyword("postFor"), Some("to"));
        assert_eq!(config.keyword("preAlt"), Some(""));
        assert_eq!(config.keyword("nonsense"), None);
        assert!(config.ignore_case);
    }

    #[test]
    fn test_set_keyword() {
        let mut config = ParserConfig::default();
        assert!(config.set_keyword("preWhile", "solange"));
        assert_eq!(config.keyword("preWhile"), Some("solange"));
        assert!(!config.set_keyword("notASlot", "x"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = UserConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: UserConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.parser.keyword("preRepeat"), Some("until"));
    }
}
