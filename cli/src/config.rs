// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use icstree::ParseOptions;
use tokio::fs;

use crate::cli::APP_NAME;

const ICSTREE_CONFIG_ENV: &str = "ICSTREE_CONFIG";

/// Load the configuration.
///
/// The file is taken from `path`, then from `ICSTREE_CONFIG`, then from the
/// user config directory. The first two must exist; a missing default file
/// means the defaults apply.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(ICSTREE_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = match get_config_dir() {
            Ok(dir) => dir.join(format!("{APP_NAME}/config.toml")),
            Err(e) => {
                tracing::debug!(error = %e, "no config directory, using defaults");
                return Ok(Config::default());
            }
        };
        if !fs::try_exists(&config).await.unwrap_or(false) {
            tracing::debug!(path = %config.display(), "no config found, using defaults");
            return Ok(Config::default());
        }
        config
    };

    fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<Config>()
        .map_err(|e| format!("Failed to parse config file at {}: {}", path.display(), e).into())
}

/// Configuration for the icstree command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Parser behavior.
    pub parser: ParserConfig,

    /// Output rendering.
    pub output: OutputConfig,
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

/// The `[parser]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Finalize the last property at end of input.
    pub finalize_trailing_property: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            finalize_trailing_property: ParseOptions::default().finalize_trailing_property,
        }
    }
}

impl ParserConfig {
    /// Parser options, with `--legacy-eof` taking precedence.
    pub fn options(self, legacy_eof: bool) -> ParseOptions {
        ParseOptions {
            finalize_trailing_property: self.finalize_trailing_property && !legacy_eof,
        }
    }
}

/// The `[output]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Treat warnings as failures.
    pub deny_warnings: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            deny_warnings: false,
        }
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}
