// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON output of milestone reports.

use crate::progress::MilestoneReport;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::{
    fs::File,
    io::{BufWriter, Write},
};

/// Write the reports to `output` as pretty-printed JSON, replacing any existing file.
pub fn write_report(output: &Utf8Path, reports: &[MilestoneReport]) -> Result<()> {
    let file = File::create(output.as_std_path())
        .with_context(|| format!("failed to create file at {}", output))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, reports)
        .with_context(|| format!("failed to write report to {}", output))?;
    writer
        .flush()
        .with_context(|| format!("failed to write report to {}", output))?;

    Ok(())
}
