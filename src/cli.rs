//! Program shell shared by both binaries: logging setup, argument parsing
//! and turning a failed run into a prefixed message and exit status.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::comment::CommentError;
use crate::config::{Config, ConfigError, TOKEN_ENV};
use crate::mr::{ApiError, MrError};
use crate::report::ReportError;

/// Every way a run can end early. Each variant is terminal; nothing retries.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("GITLAB_TOKEN environment variable is not set")]
    MissingToken,

    #[error(transparent)]
    Comment(#[from] CommentError),

    #[error(transparent)]
    Url(#[from] MrError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl Failure {
    /// Prefix that tells the user which kind of failure this was.
    pub fn prefix(&self) -> &'static str {
        match self {
            Failure::MissingToken | Failure::Comment(_) | Failure::Url(_) | Failure::Config(_) => {
                "Error"
            }
            Failure::Api(ApiError::Status { .. }) => "API Error",
            Failure::Api(_) | Failure::Report(_) => "Unexpected error",
        }
    }

    /// Full user-facing message, including any follow-up hint.
    pub fn message(&self) -> String {
        let mut message = format!("{}: {}", self.prefix(), self);
        if let Failure::MissingToken = self {
            message.push_str(&format!(
                "\nPlease set it with: export {TOKEN_ENV}=<your_token>"
            ));
        }
        message
    }
}

/// Install the stderr tracing subscriber, silent unless RUST_LOG is set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse command-line arguments. Usage errors exit with status 1;
/// `--help` and `--version` exit with status 0.
pub fn parse_args<T: Parser>() -> T {
    T::try_parse().unwrap_or_else(|err| {
        let code = if err.use_stderr() { 1 } else { 0 };
        if let Err(io_err) = err.print() {
            tracing::warn!(error = %io_err, "failed to print usage");
        }
        std::process::exit(code);
    })
}

/// Resolve the API token from the config file or the environment.
pub fn resolve_token() -> Result<String, Failure> {
    let config = Config::load()?;
    config.gitlab_token().ok_or(Failure::MissingToken)
}

/// Report a failure on stderr and map the outcome to an exit status.
pub fn finish(result: Result<(), Failure>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            tracing::debug!(error = ?failure, "run failed");
            eprintln!("{}", render_failure(&failure, std::io::stderr().is_terminal()));
            ExitCode::FAILURE
        }
    }
}

/// The failure line for stderr, red only when stderr is a terminal.
fn render_failure(failure: &Failure, color: bool) -> String {
    let message = failure.message();
    if color {
        message.red().to_string()
    } else {
        message
    }
}
