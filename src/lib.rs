//! Command-line helpers for reviewing GitLab merge requests.
//!
//! The library holds everything the two binaries share: merge request URL
//! parsing, the GitLab REST client, the diff report formatter and the comment
//! confirmation. `fetch-mr-diff` and `post-mr-comment` are thin shells over it.

pub mod cli;
pub mod comment;
pub mod config;
pub mod mr;
pub mod report;
