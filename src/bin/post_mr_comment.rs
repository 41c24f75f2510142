use std::process::ExitCode;

use clap::Parser;
use gitlab_mr_review::cli::{self, Failure};
use gitlab_mr_review::comment;
use gitlab_mr_review::mr::{self, GitLabClient};
use tracing::{debug, info, info_span, Instrument};

/// Post a comment to a GitLab merge request.
#[derive(Parser, Debug)]
#[command(
    name = "post-mr-comment",
    version,
    about,
    after_help = "Example: post-mr-comment http://gitlab.example.com/group/project/merge_requests/123 \"LGTM!\"\n\n\
                  Environment:\n  GITLAB_TOKEN  GitLab personal access token with api scope"
)]
struct Cli {
    /// Merge request URL (e.g., https://gitlab.example.com/group/project/-/merge_requests/42)
    mr_url: String,

    /// Comment body (Markdown)
    comment: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();
    let args: Cli = cli::parse_args();
    let span = info_span!("post_mr_comment", mr_url = %args.mr_url);
    cli::finish(run(args).instrument(span).await)
}

async fn run(args: Cli) -> Result<(), Failure> {
    let token = cli::resolve_token()?;
    comment::validate(&args.comment)?;

    info!("parsing MR URL");
    let mr_url = mr::parse_mr_url(&args.mr_url)?;
    debug!(base = %mr_url.base_url, project = %mr_url.project_path, iid = %mr_url.iid, "parsed MR URL");

    let client = GitLabClient::new(&mr_url.base_url, &token)?;

    info!("posting comment");
    let note = mr::post_note(&client, &mr_url, &args.comment).await?;
    info!(note_id = ?note.id, "comment posted");

    println!("{}", comment::confirmation(&args.mr_url, &note));

    Ok(())
}
