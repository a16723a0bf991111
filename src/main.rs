use anyhow::Result;
use clap::Parser;

use ado_pulse::aggregator::{self, Progress, RunOutcome};
use ado_pulse::azdo::AdoClient;
use ado_pulse::config::RunConfig;
use ado_pulse::report;

#[derive(Parser)]
#[command(name = "ado-pulse", version, about = "Azure DevOps activity metrics")]
struct Cli {
    /// Azure DevOps organization name.
    #[arg(short, long)]
    organization: String,

    /// Personal Access Token.
    #[arg(short, long, env = "ADO_PAT", hide_env_values = true)]
    pat: String,

    /// Restrict the analysis to a single project (case-insensitive).
    #[arg(long)]
    project: Option<String>,

    /// Number of days to look back.
    #[arg(short, long, default_value_t = 90)]
    days: u32,

    /// Disable TLS certificate verification (for corporate proxies).
    #[arg(long)]
    no_ssl_verify: bool,

    /// Your email address, for filtering commits and work items.
    #[arg(short, long)]
    email: Option<String>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,
}

/// Prints traversal progress to stdout, mirroring the report's plain-text
/// style.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn connected(&mut self, project_count: usize) {
        println!("Connected. Found {project_count} projects.");
        println!("{}", "=".repeat(60));
    }

    fn project(&mut self, name: &str) {
        println!("\nProject: {name}");
    }

    fn repositories(&mut self, count: usize) {
        println!("  Found {count} repositories");
    }

    fn recent_authors(&mut self, emails: &[String]) {
        let shown: Vec<&str> = emails.iter().take(3).map(String::as_str).collect();
        println!("  Recent authors in this repo: {}", shown.join(", "));
    }

    fn repo_activity(&mut self, repo: &str, commits: u64, pull_requests: u64) {
        println!("  {repo}: {commits} commits, {pull_requests} PRs (all users)");
    }

    fn work_items(&mut self, count: u64) {
        println!("  Work items assigned to you: {count}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let config = RunConfig {
        organization: cli.organization,
        pat: cli.pat,
        project: cli.project,
        days_back: cli.days,
        email: RunConfig::normalize_email(cli.email),
        verify_ssl: !cli.no_ssl_verify,
    };
    tracing::debug!(?config, "starting analysis run");

    println!(
        "Analyzing Azure DevOps activity for the last {} days...",
        config.days_back
    );
    match config.email {
        Some(ref email) => println!("Filtering by email: {email}"),
        None => println!("No email filter - showing all activity"),
    }
    println!("Testing connectivity to Azure DevOps...");

    let client = AdoClient::new(&config)?;
    let outcome = aggregator::run(&client, &config, &mut ConsoleProgress).await;

    // Failure outcomes are reported as console text; the process still exits
    // zero, as the tool always has.
    match outcome {
        RunOutcome::ConnectivityFailure => {
            println!(
                "Could not retrieve projects. Check your organization name and PAT permissions."
            );
        }
        RunOutcome::ProjectNotFound(name) => {
            println!("Project '{name}' not found!");
        }
        RunOutcome::Completed(report) => {
            report::render(&report, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
