use indexmap::IndexMap;

use crate::azdo::AdoClient;
use crate::config::RunConfig;

// ---------------------------------------------------------------------------
// Accumulated state
// ---------------------------------------------------------------------------

/// Per-repository activity counters, keyed by `"<project>/<repo>"` in the
/// report map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoStats {
    pub commits: u64,
    pub pull_requests: u64,
}

impl RepoStats {
    /// Combined activity, the ranking key for the top-repositories table.
    pub fn combined(&self) -> u64 {
        self.commits + self.pull_requests
    }
}

/// Run-scoped totals across every project visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub total_commits: u64,
    pub total_pull_requests: u64,
    pub total_work_items: u64,
}

/// Everything the presenter needs to render a summary.
#[derive(Debug)]
pub struct ActivityReport {
    pub totals: RunTotals,
    /// Insertion order == traversal order; the presenter relies on this for
    /// stable tie-breaking.
    pub repo_stats: IndexMap<String, RepoStats>,
    pub days_back: u32,
    /// The author filter in effect, if any. Changes how totals are labeled.
    pub email_filter: Option<String>,
}

/// Outcome of one aggregation run.
///
/// The two failure variants are the only explicit error states the tool
/// reports; every per-repository request failure degrades silently to zero
/// counts inside the client.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(ActivityReport),
    /// Could not list any project — bad organization name, bad PAT, or no
    /// network.
    ConnectivityFailure,
    /// A `--project` filter was given but matched nothing.
    ProjectNotFound(String),
}

// ---------------------------------------------------------------------------
// Traversal progress
// ---------------------------------------------------------------------------

/// Receives progress notifications while the traversal runs.
///
/// The binary prints these to stdout; tests capture them or ignore them.
pub trait Progress {
    /// Connectivity check passed; `project_count` projects are visible.
    fn connected(&mut self, project_count: usize) {
        let _ = project_count;
    }

    /// Entering a project.
    fn project(&mut self, name: &str) {
        let _ = name;
    }

    /// Repositories listed for the current project.
    fn repositories(&mut self, count: usize) {
        let _ = count;
    }

    /// Author emails seen in the current repository (no filter configured).
    fn recent_authors(&mut self, emails: &[String]) {
        let _ = emails;
    }

    /// A repository with nonzero combined activity. Zero-activity
    /// repositories produce no line.
    fn repo_activity(&mut self, repo: &str, commits: u64, pull_requests: u64) {
        let _ = (repo, commits, pull_requests);
    }

    /// Nonzero count of work items assigned in the current project.
    fn work_items(&mut self, count: u64) {
        let _ = count;
    }
}

/// Silent progress sink, for tests that only care about the report.
pub struct NoProgress;

impl Progress for NoProgress {}

// ---------------------------------------------------------------------------
// The traversal
// ---------------------------------------------------------------------------

/// Walk projects -> repositories -> (commits, pull requests) -> work items,
/// accumulating counters. Fully sequential; cost is one round trip per
/// project for repositories and work items, plus two per repository.
pub async fn run(
    client: &AdoClient,
    config: &RunConfig,
    progress: &mut dyn Progress,
) -> RunOutcome {
    let mut projects = client.list_projects().await;
    if projects.is_empty() {
        return RunOutcome::ConnectivityFailure;
    }
    progress.connected(projects.len());

    if let Some(ref wanted) = config.project {
        projects.retain(|p| p.name.eq_ignore_ascii_case(wanted));
        if projects.is_empty() {
            return RunOutcome::ProjectNotFound(wanted.clone());
        }
    }

    let email = config.email.as_deref();
    let mut totals = RunTotals::default();
    let mut repo_stats: IndexMap<String, RepoStats> = IndexMap::new();

    for project in &projects {
        progress.project(&project.name);

        let repositories = client.list_repositories(&project.id).await;
        progress.repositories(repositories.len());

        for repo in &repositories {
            let batch = client
                .list_commits(&project.id, &repo.id, email, config.days_back)
                .await;
            if !batch.recent_authors.is_empty() {
                progress.recent_authors(&batch.recent_authors);
            }

            // Second, client-side pass over the author filter: tolerant of a
            // server that ignored the search-criteria hint.
            let commit_count = match email {
                Some(email) => batch
                    .commits
                    .iter()
                    .filter(|c| c.author.email.eq_ignore_ascii_case(email))
                    .count() as u64,
                None => batch.commits.len() as u64,
            };

            let prs = client
                .list_pull_requests(&project.id, &repo.id, config.days_back)
                .await;
            let pr_count = prs.len() as u64;

            totals.total_commits += commit_count;
            totals.total_pull_requests += pr_count;
            repo_stats.insert(
                format!("{}/{}", project.name, repo.name),
                RepoStats {
                    commits: commit_count,
                    pull_requests: pr_count,
                },
            );

            if commit_count > 0 || pr_count > 0 {
                progress.repo_activity(&repo.name, commit_count, pr_count);
            }
        }

        let work_items = client
            .query_assigned_work_items(&project.id, email, config.days_back)
            .await;
        let work_item_count = work_items.len() as u64;
        totals.total_work_items += work_item_count;
        if work_item_count > 0 {
            progress.work_items(work_item_count);
        }
    }

    RunOutcome::Completed(ActivityReport {
        totals,
        repo_stats,
        days_back: config.days_back,
        email_filter: email.map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_stats_combined_sums_both_counters() {
        let stats = RepoStats {
            commits: 3,
            pull_requests: 4,
        };
        assert_eq!(stats.combined(), 7);
    }

    #[test]
    fn default_stats_are_zero() {
        assert_eq!(RepoStats::default().combined(), 0);
        assert_eq!(RunTotals::default().total_commits, 0);
    }
}
