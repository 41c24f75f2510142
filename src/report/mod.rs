pub mod types;

pub use types::FileStatus;

use crate::mr::{FileChange, MergeRequest};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

const RULE_WIDTH: usize = 60;
const NO_DIFF: &str = "(binary file or no diff available)";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Render merge request metadata and its file changes as a plain-text review
/// report: overview banner, numbered file list, then every diff verbatim.
pub fn format_report(mr: &MergeRequest, changes: &[FileChange]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out: Vec<String> = Vec::new();

    out.push(rule.clone());
    out.push(format!("Merge Request: !{} - {}", mr.iid, mr.title));
    out.push(rule.clone());
    out.push(format!("Author: {} (@{})", mr.author.name, mr.author.username));
    out.push(format!("Source: {} -> {}", mr.source_branch, mr.target_branch));
    out.push(format!("State: {}", mr.state));
    out.push(format!("URL: {}", mr.web_url));

    if let Some(description) = mr.description.as_deref().filter(|d| !d.is_empty()) {
        out.push(format!("\nDescription:\n{}", description));
    }

    out.push(format!("\n{}", rule));
    out.push("Changed Files".to_string());
    out.push(rule.clone());

    for (i, change) in changes.iter().enumerate() {
        let status = FileStatus::of(change);
        out.push(format!("{}. {} {}", i + 1, status, status.display_path(change)));
    }

    out.push(format!("\nTotal: {} file(s) changed", changes.len()));

    out.push(format!("\n{}", rule));
    out.push("Detailed Diffs".to_string());
    out.push(rule);

    for change in changes {
        let path = change
            .new_path
            .as_deref()
            .or(change.old_path.as_deref())
            .unwrap_or("unknown");
        out.push(format!("\n--- {} ---", path));

        match change.diff.as_deref().filter(|d| !d.is_empty()) {
            Some(diff) => out.push(diff.to_string()),
            None => out.push(NO_DIFF.to_string()),
        }
    }

    out.join("\n")
}

/// Print the report to stdout, or write it to `output_path` when given.
#[instrument(skip(report), fields(report_bytes = report.len()))]
pub fn output(report: &str, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            println!("{}", report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            std::fs::write(path, format!("{}\n", report))?;
            Ok(())
        }
    }
}
