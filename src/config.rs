//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dagnode/dagnode.toml`
//! 3. Local config: `<dir>/.dagnode.toml`
//! 4. Environment variables: `DAGNODE_*` prefix

use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;

/// How the `show` command renders a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// `|----name` outline with tab indentation
    #[default]
    List,
    /// Box-drawing tree
    Tree,
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "tree" => Ok(Self::Tree),
            other => Err(format!("unknown render style: {}", other)),
        }
    }
}

/// Unified configuration for dagnode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default rendering of `show`
    pub render: RenderStyle,
    /// Search patterns ignore case unless overridden
    pub case_insensitive: bool,
    /// Sort descending unless overridden
    pub reverse_order: bool,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render: RenderStyle::List,
            case_insensitive: false,
            reverse_order: false,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: Option<RenderStyle>,
    pub case_insensitive: Option<bool>,
    pub reverse_order: Option<bool>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for dagnode.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dagnode").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dagnode.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".dagnode.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: overlay.render.unwrap_or(self.render),
            case_insensitive: overlay.case_insensitive.unwrap_or(self.case_insensitive),
            reverse_order: overlay.reverse_order.unwrap_or(self.reverse_order),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.dagnode.toml`
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Layered load with an explicit global config location.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(global_path)?);
                debug!(path = %global_path.display(), "applied global config");
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
                debug!(path = %local_path.display(), "applied local config");
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply DAGNODE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DAGNODE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("render") {
            settings.render = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_bool("case_insensitive") {
            settings.case_insensitive = val;
        }
        if let Ok(val) = config.get_bool("reverse_order") {
            settings.reverse_order = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Settings as TOML, as written in a config file.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("list", RenderStyle::List)]
    #[case(" Tree ", RenderStyle::Tree)]
    fn given_style_name_when_parsed_then_matches(#[case] input: &str, #[case] expected: RenderStyle) {
        assert_eq!(input.parse::<RenderStyle>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_style_when_parsed_then_error() {
        assert!("fancy".parse::<RenderStyle>().is_err());
    }

    #[test]
    fn given_partial_overlay_when_merged_then_keeps_unspecified() {
        let overlay = RawSettings {
            render: Some(RenderStyle::Tree),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.render, RenderStyle::Tree);
        assert!(merged.color);
    }
}
