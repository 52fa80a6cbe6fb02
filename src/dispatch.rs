// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing and command dispatch.

use crate::{
    commands,
    config::{Config, FileConfig, Overrides},
};
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

/// Report completion progress of a GitHub repository's open milestones.
///
/// The access token is read from the GITHUB_TOKEN environment variable.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Repository as 'owner/name' [default: $GITHUB_REPOSITORY, then desinsight/snap-codex-scheduler]
    #[arg(short, long)]
    repository: Option<String>,

    /// Output JSON file [default: milestone_progress.json]
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,

    /// GitHub API base URL [default: https://api.github.com]
    #[arg(long)]
    api_url: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<Utf8PathBuf>,
}

impl Args {
    fn into_parts(self) -> (Overrides, Option<Utf8PathBuf>) {
        let overrides = Overrides {
            repository: self.repository,
            output: self.output,
            api_url: self.api_url,
        };
        (overrides, self.config)
    }
}

/// Parse arguments and run the report.
pub async fn dispatch() -> Result<()> {
    run(Args::parse(), |name| std::env::var(name).ok()).await
}

async fn run(args: Args, env: impl Fn(&str) -> Option<String>) -> Result<()> {
    let (overrides, config_path) = args.into_parts();

    let file = match config_path {
        Some(path) => FileConfig::load(&path)?,
        None => FileConfig::default(),
    };
    let config = Config::resolve(overrides, file, env)?;
    tracing::debug!(?config, "resolved configuration");

    commands::run_report(&config).await
}
