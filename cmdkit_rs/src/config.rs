//! Configuration for the cmdkit front-end.
//!
//! Program metadata comes from Cargo. User preferences are read from an
//! optional `config.toml` in the platform config directory
//! (`~/.config/cmdkit/config.toml` on Linux) and can be overridden through
//! the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::colors::ColorMode;

/// User preferences read from `config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Color mode for terminal output
    pub color: ColorMode,
    /// Base log filter (tracing directives, e.g. `"warn"` or `"cmdkit=debug"`)
    pub log_level: Option<String>,
}

/// Resolved settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Program name shown in usage banners and hints
    pub binary_name: String,
    /// Version printed by `--version`
    pub version: String,
    pub color: ColorMode,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            binary_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            color: ColorMode::Auto,
            log_level: None,
        }
    }
}

impl FileConfig {
    /// Default location: `<config_dir>/cmdkit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cmdkit").join("config.toml"))
    }

    /// Load config from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("[cmdkit][warn] Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[cmdkit][warn] Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then the process environment.
    pub fn load() -> Self {
        let file = FileConfig::default_path()
            .map(|path| FileConfig::load_from_path(&path))
            .unwrap_or_default();
        let mut config = Self::default().with_file(file);
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn with_file(mut self, file: FileConfig) -> Self {
        self.color = file.color;
        self.log_level = file.log_level;
        self
    }

    /// Apply `CMDKIT_COLOR`, `NO_COLOR` and `CMDKIT_LOG`.
    ///
    /// `NO_COLOR` (any non-empty value) beats `CMDKIT_COLOR`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CMDKIT_COLOR") {
            match value.parse::<ColorMode>() {
                Ok(mode) => self.color = mode,
                Err(e) => eprintln!("[cmdkit][warn] CMDKIT_COLOR: {}", e),
            }
        }
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            self.color = ColorMode::Never;
        }
        if let Some(level) = lookup("CMDKIT_LOG").filter(|level| !level.trim().is_empty()) {
            self.log_level = Some(level);
        }
    }
}
