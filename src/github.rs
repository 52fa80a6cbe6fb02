// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub API client for fetching milestones and their issues.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, de::DeserializeOwned};
use std::fmt;

const USER_AGENT: &str = "milestone-progress-reporter";
const PER_PAGE: usize = 100;

/// Open/closed state of an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Open,
    Closed,
}

/// State filter for list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateFilter {
    Open,
    All,
}

impl StateFilter {
    fn as_str(self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::All => "all",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

/// An issue as returned by the issues endpoint. Pull requests attached to a
/// milestone show up here too.
#[derive(Clone, Debug, Deserialize)]
pub struct Issue {
    pub state: State,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    full_name: String,
}

/// An authenticated GitHub REST client.
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    auth_header: String,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {}", token),
        })
    }

    /// Look up a repository by its `owner/name` identifier.
    ///
    /// This performs a request so that a missing repository or a bad token is
    /// reported here rather than on the first milestone query.
    pub async fn get_repo(&self, identifier: &str) -> Result<Repository<'_>> {
        let (owner, name) = parse_repository(identifier)?;
        let path = format!("/repos/{}/{}", owner, name);

        let info: RepositoryInfo = self
            .get_json(&path, &[])
            .await
            .with_context(|| format!("failed to look up repository '{}'", identifier))?;
        tracing::debug!(repository = %info.full_name, "resolved repository");

        Ok(Repository {
            client: self,
            full_name: info.full_name,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", &self.auth_header)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "GitHub API request failed with status {} for {}: {}",
                status,
                url,
                body
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("failed to parse GitHub API response for {}", url))
    }

    /// Fetch every page of a list endpoint.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let mut query = params.to_vec();
            query.push(("per_page", PER_PAGE.to_string()));
            query.push(("page", page.to_string()));

            let items: Vec<T> = self
                .get_json(path, &query)
                .await
                .with_context(|| format!("failed to fetch page {}", page))?;

            let is_last_page = items.len() < PER_PAGE;
            all_items.extend(items);

            if is_last_page {
                break;
            }

            page += 1;
        }

        Ok(all_items)
    }
}

/// Handle to a single repository.
#[derive(Debug)]
pub struct Repository<'a> {
    client: &'a GitHubClient,
    full_name: String,
}

impl Repository<'_> {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub async fn get_milestones(&self, state: StateFilter) -> Result<Vec<Milestone>> {
        let path = format!("/repos/{}/milestones", self.full_name);
        self.client
            .get_all_pages(&path, &[("state", state.as_str().to_string())])
            .await
            .with_context(|| format!("failed to list milestones of {}", self.full_name))
    }

    pub async fn get_issues(&self, milestone: &Milestone, state: StateFilter) -> Result<Vec<Issue>> {
        let path = format!("/repos/{}/issues", self.full_name);
        self.client
            .get_all_pages(
                &path,
                &[
                    ("milestone", milestone.number.to_string()),
                    ("state", state.as_str().to_string()),
                ],
            )
            .await
            .with_context(|| format!("failed to list issues of milestone '{}'", milestone.title))
    }
}

/// Split an `owner/name` repository identifier.
pub fn parse_repository(identifier: &str) -> Result<(&str, &str)> {
    match identifier.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => anyhow::bail!(
            "invalid repository identifier '{}': expected 'owner/name'",
            identifier
        ),
    }
}
