//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[serde(default)]` uses `Default::default()` for missing fields, so a
//! config file only needs to name the settings it changes:
//!
//! ```toml
//! [autocomplete]
//! min_prefix_len = 3
//!
//! [ui]
//! theme = "Nord"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tinct_syntax::{BuiltinPlacement, ClassifierOptions};

use crate::autocomplete::AutocompleteOptions;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editing behavior
    pub editor: EditorConfig,

    /// Keyword suggestions
    pub autocomplete: AutocompleteConfig,

    /// Classifier passes
    pub highlight: HighlightConfig,

    /// Appearance
    pub ui: UiConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default config: {}", err);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tinct").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Saves the config to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            builtins: self.highlight.builtins,
            builtin_placement: self.highlight.builtin_placement,
        }
    }

    pub fn autocomplete_options(&self) -> AutocompleteOptions {
        AutocompleteOptions {
            enabled: self.autocomplete.enabled,
            min_prefix_len: self.autocomplete.min_prefix_len,
            max_candidates: self.autocomplete.max_candidates,
        }
    }
}

/// Editing behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Insert `)`, `]` or `}` after typing an opener
    pub auto_close_brackets: bool,

    /// Undo history limit
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            auto_close_brackets: true,
            undo_limit: 1000,
        }
    }
}

/// Autocomplete behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    pub enabled: bool,

    /// Characters typed before suggestions appear
    pub min_prefix_len: usize,

    /// Maximum suggestions shown (0 = unlimited)
    pub max_candidates: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        let options = AutocompleteOptions::default();
        Self {
            enabled: options.enabled,
            min_prefix_len: options.min_prefix_len,
            max_candidates: options.max_candidates,
        }
    }
}

/// Highlighting behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Tag builtin names such as `print`
    pub builtins: bool,

    /// Whether builtins paint over everything (`last`) or under it (`first`)
    pub builtin_placement: BuiltinPlacement,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            builtins: true,
            builtin_placement: BuiltinPlacement::Last,
        }
    }
}

/// UI appearance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name
    pub theme: String,

    /// Show line numbers
    pub line_numbers: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "Light".to_string(),
            line_numbers: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.editor.auto_close_brackets);
        assert_eq!(config.editor.undo_limit, 1000);
        assert_eq!(config.autocomplete.min_prefix_len, 2);
        assert_eq!(config.autocomplete.max_candidates, 0);
        assert_eq!(config.highlight.builtin_placement, BuiltinPlacement::Last);
        assert_eq!(config.ui.theme, "Light");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [highlight]
            builtin_placement = "first"

            [ui]
            theme = "Nord"
            "#,
        )
        .unwrap();
        assert_eq!(config.highlight.builtin_placement, BuiltinPlacement::First);
        assert!(config.highlight.builtins);
        assert_eq!(config.ui.theme, "Nord");
        assert!(config.ui.line_numbers);
        assert_eq!(config.classifier_options().builtin_placement, BuiltinPlacement::First);
    }

    #[test]
    fn test_bad_placement_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[highlight]\nbuiltin_placement = \"middle\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.autocomplete.max_candidates = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.autocomplete_options().max_candidates, 5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
