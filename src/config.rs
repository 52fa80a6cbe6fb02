// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for milestone progress reporting.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::{fmt, fs};
use thiserror::Error;

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";

pub const DEFAULT_REPOSITORY: &str = "desinsight/snap-codex-scheduler";
pub const DEFAULT_OUTPUT: &str = "milestone_progress.json";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN environment variable is not set")]
    MissingToken,
}

/// Optional settings read from a TOML file.
///
/// The access token is never read from the file, only from the environment.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub repository: Option<String>,
    pub output: Option<Utf8PathBuf>,
    pub api_url: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path.as_std_path())
            .with_context(|| format!("failed to read config file at {}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file at {}", path))
    }
}

/// Values given on the command line. These win over everything else.
#[derive(Debug, Default)]
pub struct Overrides {
    pub repository: Option<String>,
    pub output: Option<Utf8PathBuf>,
    pub api_url: Option<String>,
}

pub struct Config {
    pub token: String,
    pub repository: String,
    pub output: Utf8PathBuf,
    pub api_url: String,
}

impl Config {
    /// Resolve the effective configuration.
    ///
    /// Precedence is command line, then environment, then config file, then
    /// the built-in default. Empty values are treated as unset.
    pub fn resolve(
        overrides: Overrides,
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = non_empty(lookup(TOKEN_VAR)).ok_or(ConfigError::MissingToken)?;

        let repository = non_empty(overrides.repository)
            .or_else(|| non_empty(lookup(REPOSITORY_VAR)))
            .or_else(|| non_empty(file.repository))
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());

        let output = overrides
            .output
            .or(file.output)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT));

        let api_url = non_empty(overrides.api_url)
            .or_else(|| non_empty(file.api_url))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            token,
            repository,
            output,
            api_url,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("output", &self.output)
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
