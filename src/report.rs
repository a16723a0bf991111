use std::io;

use chrono::Local;

use crate::aggregator::{ActivityReport, RepoStats};

/// Maximum number of repositories shown in the activity ranking.
const TOP_N: usize = 10;

/// Rank repositories by combined activity, descending.
///
/// The sort is stable, so repositories with equal activity keep their
/// traversal order. Zero-activity repositories are excluded, and at most
/// [`TOP_N`] entries are returned.
pub fn top_repositories(report: &ActivityReport) -> Vec<(&str, &RepoStats)> {
    let mut entries: Vec<(&str, &RepoStats)> = report
        .repo_stats
        .iter()
        .filter(|(_, stats)| stats.combined() > 0)
        .map(|(key, stats)| (key.as_str(), stats))
        .collect();
    entries.sort_by(|a, b| b.1.combined().cmp(&a.1.combined()));
    entries.truncate(TOP_N);
    entries
}

/// Render the summary block to `out`.
pub fn render(report: &ActivityReport, out: &mut impl io::Write) -> io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "SUMMARY METRICS")?;
    writeln!(out, "{rule}")?;

    // Commits are user-scoped only when an email filter was in effect.
    if report.email_filter.is_some() {
        writeln!(out, "Your commits: {}", report.totals.total_commits)?;
    } else {
        writeln!(
            out,
            "Total commits (all users): {}",
            report.totals.total_commits
        )?;
    }
    // Pull requests are never user-scoped.
    writeln!(
        out,
        "Total pull requests (all users): {}",
        report.totals.total_pull_requests
    )?;
    writeln!(
        out,
        "Work items assigned to you: {}",
        report.totals.total_work_items
    )?;

    let top = top_repositories(report);
    if !top.is_empty() {
        writeln!(out)?;
        writeln!(out, "Most active repositories:")?;
        for (key, stats) in top {
            writeln!(
                out,
                "  - {key}: {} commits, {} PRs",
                stats.commits, stats.pull_requests
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Analysis period: last {} days", report.days_back)?;
    writeln!(
        out,
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    Ok(())
}
