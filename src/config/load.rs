//! The main config loading module for g.
//!
//! Handles loading and deserializing settings from `g.toml`.
//!
//! Provides the main [Config] struct, as well as the internal [RawConfig] used for parsing.
//! A missing file is not an error, a broken one logs a warning and falls back to defaults.

use crate::config::{Display, General, InternalGeneral};
use crate::core::formatter::is_valid_time_format;
use crate::utils::get_home;

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};

/// Raw configuration as read from the toml file.
/// It is converted into the main [Config] struct, which validates values.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct RawConfig {
    general: General,
    display: Display,
}

/// Main configuration struct for g
#[derive(Debug, Clone, Default)]
pub struct Config {
    general: InternalGeneral,
    display: Display,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let mut display = raw.display;
        if !is_valid_time_format(display.time_format()) {
            let format = display.time_format().to_string();
            tracing::warn!("invalid time_format '{}', using the default", format);
            display.reset_time_format();
        }
        Self {
            general: InternalGeneral::from(raw.general),
            display,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, falling back to the defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config file at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!("cannot read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        Self::parse(&content).unwrap_or_else(|e| {
            tracing::warn!("error parsing config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Parses toml content.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Determine the default configuration file path.
    /// Checks the G_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/g/g.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("G_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("g/g.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/g/g.toml");
        }
        PathBuf::from("g.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("config file already exists at {}", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)
    }
}

const DEFAULT_TOML: &str = r##"# g.toml - configuration for g
#
# Commented values are the internal defaults.
# Command line flags always win over this file.

[general]
# dirs_first = true
# show_hidden = false
# case_insensitive = true
# sort = "name"            # name, natural, size, modified, extension
# reverse = false
# threads = 8

[display]
# layout = "grid"          # grid, across, oneline, zero, comma, table, json, markdown, tree
# long = false
# icons = false
# git = false
# mime = false
# hyperlink = false
# classify = false
# color = "auto"           # auto, always, never
# time_format = "%Y-%m-%d %H:%M"
# tree_style = "unicode"   # unicode, rectangle, ascii
# table_style = "unicode"  # unicode, ascii
# theme = "~/.config/g/theme.json"
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SortKey;
    use crate::layout::LayoutKind;
    use tempfile::tempdir;

    #[test]
    fn partial_tables_keep_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::parse(
            r#"
            [general]
            sort = "version"
            threads = 1000

            [display]
            layout = "tree"
            icons = true
            "#,
        )?;
        assert_eq!(config.general().sort(), SortKey::Natural);
        assert_eq!(config.general().threads(), Some(64));
        assert!(config.general().dirs_first());
        assert_eq!(config.display().layout(), Some(LayoutKind::Tree));
        assert!(config.display().icons());
        assert!(!config.display().git());
        Ok(())
    }

    #[test]
    fn bad_time_format_falls_back() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::parse("[display]\ntime_format = \"%Q\"\n")?;
        assert_eq!(
            config.display().time_format(),
            crate::core::formatter::DEFAULT_TIME_FORMAT
        );
        Ok(())
    }

    #[test]
    fn missing_or_broken_files_use_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let missing = Config::load_from(&dir.path().join("nope.toml"));
        assert!(!missing.general().show_hidden());

        let broken = dir.path().join("g.toml");
        fs::write(&broken, "[general\nshow_hidden = true")?;
        assert!(!Config::load_from(&broken).general().show_hidden());
        Ok(())
    }

    #[test]
    fn generated_default_parses() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("sub/g.toml");
        Config::generate_default(&path)?;
        assert!(Config::parse(&fs::read_to_string(&path)?).is_ok());
        assert!(Config::generate_default(&path).is_err());
        Ok(())
    }
}
