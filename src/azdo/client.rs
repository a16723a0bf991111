use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::azdo::types::{
    Commit, CommitBatch, ListEnvelope, Project, PullRequest, Repository, WorkItemQueryResult,
    WorkItemRef,
};
use crate::config::RunConfig;

/// REST API version sent with every request.
const API_VERSION: &str = "6.0";

/// Page size for list endpoints. There is no pagination: anything past the
/// first page is ignored.
const PAGE_SIZE: u32 = 1000;

/// How many commits to scan when sampling author emails for display.
const AUTHOR_SAMPLE_WINDOW: usize = 20;

/// Client for the Azure DevOps REST API.
///
/// Every list operation is fail-soft: a transport error or non-2xx status
/// yields an empty collection, indistinguishable from a legitimately empty
/// result. This mirrors the behavior the tool has always had; callers that
/// need a connectivity signal check whether `list_projects` came back empty.
/// Failures are still visible at debug level via `tracing`.
pub struct AdoClient {
    http: reqwest::Client,
    base_url: String,
    pat: String,
}

impl AdoClient {
    /// Build a client for `https://dev.azure.com/{organization}`.
    pub fn new(config: &RunConfig) -> Result<Self> {
        let base_url = format!("https://dev.azure.com/{}", config.organization);
        Self::with_base_url(config, base_url)
    }

    /// Build a client against an explicit base URL (used by tests to point
    /// at a mock server).
    pub fn with_base_url(config: &RunConfig, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            pat: config.pat.clone(),
        })
    }

    /// List all projects in the organization. Empty on any failure.
    pub async fn list_projects(&self) -> Vec<Project> {
        let url = format!("{}/_apis/projects", self.base_url);
        self.get_list(&url, &[]).await
    }

    /// List all Git repositories in a project. Empty on any failure.
    pub async fn list_repositories(&self, project_id: &str) -> Vec<Repository> {
        let url = format!("{}/{}/_apis/git/repositories", self.base_url, project_id);
        self.get_list(&url, &[]).await
    }

    /// List commits from the trailing `days_back` window.
    ///
    /// When `author` is set it is passed to the server as a search-criteria
    /// filter. When it is absent, the batch additionally carries a sample of
    /// distinct author emails (drawn from the first few commits) so the
    /// caller can show the user what emails exist in the repository.
    pub async fn list_commits(
        &self,
        project_id: &str,
        repo_id: &str,
        author: Option<&str>,
        days_back: u32,
    ) -> CommitBatch {
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/commits",
            self.base_url, project_id, repo_id
        );
        let since = since_date(days_back);
        let top = PAGE_SIZE.to_string();
        let mut params: Vec<(&str, &str)> =
            vec![("searchCriteria.fromDate", &since), ("$top", &top)];
        if let Some(email) = author {
            params.push(("searchCriteria.author", email));
        }

        let commits: Vec<Commit> = self.get_list(&url, &params).await;

        let recent_authors = if author.is_none() {
            sample_author_emails(&commits)
        } else {
            Vec::new()
        };

        CommitBatch {
            commits,
            recent_authors,
        }
    }

    /// List pull requests of any status. Empty on any failure.
    ///
    /// `days_back` is accepted for symmetry with `list_commits` but is not
    /// applied: the endpoint is queried without a date range, so PR counts
    /// cover the repository's whole history. Long-standing quirk, kept as-is.
    pub async fn list_pull_requests(
        &self,
        project_id: &str,
        repo_id: &str,
        _days_back: u32,
    ) -> Vec<PullRequest> {
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/pullrequests",
            self.base_url, project_id, repo_id
        );
        let top = PAGE_SIZE.to_string();
        self.get_list(&url, &[("searchCriteria.status", "all"), ("$top", &top)])
            .await
    }

    /// Run a WIQL query for work items assigned to `user_email` created
    /// within the window. Returns empty without touching the network when no
    /// email is configured.
    pub async fn query_assigned_work_items(
        &self,
        project_id: &str,
        user_email: Option<&str>,
        days_back: u32,
    ) -> Vec<WorkItemRef> {
        let Some(email) = user_email else {
            return Vec::new();
        };

        let since = since_date(days_back);
        let wiql = json!({
            "query": format!(
                "SELECT [System.Id], [System.Title], [System.State], \
                 [System.WorkItemType], [System.CreatedDate] \
                 FROM WorkItems \
                 WHERE [System.AssignedTo] = '{email}' \
                 AND [System.CreatedDate] >= '{since}' \
                 ORDER BY [System.CreatedDate] DESC"
            ),
        });

        let url = format!("{}/{}/_apis/wit/wiql", self.base_url, project_id);
        let response = self
            .http
            .post(&url)
            .basic_auth("", Some(&self.pat))
            .query(&[("api-version", API_VERSION)])
            .json(&wiql)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                match resp.json::<WorkItemQueryResult>().await {
                    Ok(result) => result.work_items,
                    Err(err) => {
                        tracing::debug!(%url, error = %err, "failed to parse WIQL response");
                        Vec::new()
                    }
                }
            }
            Ok(resp) => {
                tracing::debug!(%url, status = %resp.status(), "WIQL query rejected");
                Vec::new()
            }
            Err(err) => {
                tracing::debug!(%url, error = %err, "WIQL request failed");
                Vec::new()
            }
        }
    }

    /// GET a list endpoint and unwrap its `value` array, degrading to empty
    /// on any failure.
    async fn get_list<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Vec<T> {
        let response = self
            .http
            .get(url)
            .basic_auth("", Some(&self.pat))
            .query(&[("api-version", API_VERSION)])
            .query(params)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                match resp.json::<ListEnvelope<T>>().await {
                    Ok(envelope) => envelope.value,
                    Err(err) => {
                        tracing::debug!(%url, error = %err, "failed to parse list response");
                        Vec::new()
                    }
                }
            }
            Ok(resp) => {
                tracing::debug!(%url, status = %resp.status(), "request rejected");
                Vec::new()
            }
            Err(err) => {
                tracing::debug!(%url, error = %err, "request failed");
                Vec::new()
            }
        }
    }
}

/// Start of the lookback window as a `YYYY-MM-DD` date string.
fn since_date(days_back: u32) -> String {
    let since = Utc::now() - Duration::days(i64::from(days_back));
    since.format("%Y-%m-%d").to_string()
}

/// Distinct author emails from the head of a commit list, in first-seen
/// order. Entries without an `@` are skipped.
fn sample_author_emails(commits: &[Commit]) -> Vec<String> {
    let mut emails: Vec<String> = Vec::new();
    for commit in commits.iter().take(AUTHOR_SAMPLE_WINDOW) {
        let email = &commit.author.email;
        if email.contains('@') && !emails.iter().any(|e| e == email) {
            emails.push(email.clone());
        }
    }
    emails
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azdo::types::CommitAuthor;

    fn commit(email: &str) -> Commit {
        Commit {
            commit_id: "deadbeef".into(),
            author: CommitAuthor {
                name: String::new(),
                email: email.into(),
                date: None,
            },
        }
    }

    #[test]
    fn since_date_is_a_plain_date() {
        let date = since_date(90);
        assert_eq!(date.len(), 10);
        assert_eq!(date.matches('-').count(), 2);
    }

    #[test]
    fn author_sample_deduplicates_in_first_seen_order() {
        let commits = vec![
            commit("a@example.com"),
            commit("b@example.com"),
            commit("a@example.com"),
        ];
        assert_eq!(
            sample_author_emails(&commits),
            vec!["a@example.com".to_owned(), "b@example.com".to_owned()]
        );
    }

    #[test]
    fn author_sample_skips_malformed_emails() {
        let commits = vec![commit("not-an-email"), commit(""), commit("ok@example.com")];
        assert_eq!(
            sample_author_emails(&commits),
            vec!["ok@example.com".to_owned()]
        );
    }

    #[test]
    fn author_sample_only_scans_the_head_of_the_list() {
        let mut commits: Vec<Commit> = (0..AUTHOR_SAMPLE_WINDOW)
            .map(|i| commit(&format!("dev{i}@example.com")))
            .collect();
        commits.push(commit("late@example.com"));
        let sample = sample_author_emails(&commits);
        assert_eq!(sample.len(), AUTHOR_SAMPLE_WINDOW);
        assert!(!sample.contains(&"late@example.com".to_owned()));
    }
}
