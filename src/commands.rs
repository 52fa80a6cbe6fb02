// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations.

use crate::{config::Config, github::GitHubClient, progress, report};
use anyhow::{Context, Result};

/// Fetch milestone progress for the configured repository and write the report.
pub async fn run_report(config: &Config) -> Result<()> {
    let client = GitHubClient::new(&config.api_url, &config.token)?;
    let repo = client.get_repo(&config.repository).await?;

    tracing::info!(repository = repo.full_name(), "collecting milestone progress");
    let reports = progress::collect_progress(&repo)
        .await
        .context("failed to collect milestone progress")?;

    report::write_report(&config.output, &reports)?;

    println!("Progress data has been saved to {}", config.output);
    Ok(())
}
