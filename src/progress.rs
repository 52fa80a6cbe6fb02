// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-milestone completion statistics.

use crate::github::{Issue, Milestone, Repository, State, StateFilter};
use anyhow::Result;
use serde::Serialize;
use std::future::Future;

/// Substring that marks a label as a feature label (matched case-insensitively).
const FEATURE_MARKER: &str = "feature";

/// Source of milestones and issues.
pub trait IssueTracker {
    fn open_milestones(&self) -> impl Future<Output = Result<Vec<Milestone>>>;

    fn milestone_issues(&self, milestone: &Milestone) -> impl Future<Output = Result<Vec<Issue>>>;
}

impl IssueTracker for Repository<'_> {
    async fn open_milestones(&self) -> Result<Vec<Milestone>> {
        self.get_milestones(StateFilter::Open).await
    }

    async fn milestone_issues(&self, milestone: &Milestone) -> Result<Vec<Issue>> {
        self.get_issues(milestone, StateFilter::All).await
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MilestoneReport {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub total_issues: u64,
    pub completed_issues: u64,
    pub completion_percentage: f64,
    pub features: u64,
}

#[derive(Debug, Default)]
struct IssueTally {
    total: u64,
    completed: u64,
    features: u64,
}

impl IssueTally {
    fn record(&mut self, issue: &Issue) {
        self.total += 1;
        if issue.state == State::Closed {
            self.completed += 1;
        }
        // At most one increment per issue, however many labels match.
        if issue.labels.iter().any(|label| is_feature_label(&label.name)) {
            self.features += 1;
        }
    }
}

/// Whether a label name marks its issue as a feature.
pub fn is_feature_label(name: &str) -> bool {
    name.to_lowercase().contains(FEATURE_MARKER)
}

/// Percentage of completed issues, rounded to two decimal places.
///
/// Returns 0 for a milestone without issues. Rounding goes through the
/// formatter, which works on the exact binary value and breaks ties to even,
/// so 1/32 gives 3.12 rather than 3.13.
pub fn completion_percentage(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percentage = completed as f64 / total as f64 * 100.0;
    format!("{:.2}", percentage).parse().unwrap_or(percentage)
}

/// Aggregate the issues of one milestone into a report.
pub fn build_report(milestone: &Milestone, issues: &[Issue]) -> MilestoneReport {
    let mut tally = IssueTally::default();
    for issue in issues {
        tally.record(issue);
    }

    MilestoneReport {
        title: milestone.title.clone(),
        description: milestone.description.clone().unwrap_or_default(),
        due_date: milestone.due_on.map(|due| due.to_rfc3339()),
        total_issues: tally.total,
        completed_issues: tally.completed,
        completion_percentage: completion_percentage(tally.completed, tally.total),
        features: tally.features,
    }
}

/// Build a report for every open milestone.
///
/// Failing to list the milestones is fatal. A milestone whose issues cannot be
/// fetched is logged and left out of the result.
pub async fn collect_progress<T: IssueTracker>(tracker: &T) -> Result<Vec<MilestoneReport>> {
    let milestones = tracker.open_milestones().await?;
    tracing::info!(count = milestones.len(), "found open milestones");

    let mut reports = Vec::with_capacity(milestones.len());

    for milestone in milestones {
        match tracker.milestone_issues(&milestone).await {
            Ok(issues) => {
                let report = build_report(&milestone, &issues);
                tracing::debug!(
                    milestone = %report.title,
                    total = report.total_issues,
                    completed = report.completed_issues,
                    "processed milestone"
                );
                reports.push(report);
            }
            Err(error) => {
                let error = format!("{:#}", error);
                tracing::error!(
                    milestone = %milestone.title,
                    error = %error,
                    "error processing milestone, skipping"
                );
            }
        }
    }

    Ok(reports)
}
