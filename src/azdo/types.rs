use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Standard Azure DevOps list envelope: `{"count": N, "value": [...]}`.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Envelope returned by the WIQL query endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemQueryResult {
    #[serde(default)]
    pub work_items: Vec<WorkItemRef>,
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
}

/// A single commit; only the author matters for aggregation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_id: String,
    #[serde(default)]
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Counted but otherwise opaque; no per-user filtering is applied to pull
/// requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: u64,
}

/// Reference to a work item returned by a WIQL query; only its presence is
/// counted.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemRef {
    pub id: u64,
}

// ---------------------------------------------------------------------------
// Client-side aggregates
// ---------------------------------------------------------------------------

/// Commits for one repository, plus an informational sample of author emails
/// seen there (populated only when no author filter is configured; display
/// only, never used for counting).
#[derive(Debug, Default)]
pub struct CommitBatch {
    pub commits: Vec<Commit>,
    pub recent_authors: Vec<String>,
}
