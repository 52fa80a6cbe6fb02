// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Milestone progress reporting for GitHub repositories.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod github;
pub mod progress;
pub mod report;
