use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gitlab_mr_review::cli::{self, Failure};
use gitlab_mr_review::mr::{self, GitLabClient};
use gitlab_mr_review::report;
use tracing::{debug, info, info_span, Instrument};

/// Fetch a GitLab merge request's metadata and file diffs as a plain-text
/// report for code review.
#[derive(Parser, Debug)]
#[command(
    name = "fetch-mr-diff",
    version,
    about,
    after_help = "Example: fetch-mr-diff http://gitlab.example.com/group/project/merge_requests/123\n\n\
                  Environment:\n  GITLAB_TOKEN  GitLab personal access token with api scope"
)]
struct Cli {
    /// Merge request URL (e.g., https://gitlab.example.com/group/project/-/merge_requests/42)
    mr_url: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();
    let args: Cli = cli::parse_args();
    let span = info_span!("fetch_mr_diff", mr_url = %args.mr_url);
    cli::finish(run(args).instrument(span).await)
}

async fn run(args: Cli) -> Result<(), Failure> {
    let token = cli::resolve_token()?;

    info!("parsing MR URL");
    let mr_url = mr::parse_mr_url(&args.mr_url)?;
    debug!(base = %mr_url.base_url, project = %mr_url.project_path, iid = %mr_url.iid, "parsed MR URL");

    let client = GitLabClient::new(&mr_url.base_url, &token)?;

    info!("fetching merge request");
    let info = mr::fetch_merge_request(&client, &mr_url).await?;

    info!("fetching changes");
    let changes = mr::fetch_changes(&client, &mr_url).await?;
    info!(files = changes.changes.len(), "fetched changes");

    let built_report = report::format_report(&info, &changes.changes);
    report::output(&built_report, args.output.as_deref())?;
    info!("done");

    Ok(())
}
