pub mod client;
pub mod types;

pub use client::{ApiError, GitLabClient};
pub use types::{Changes, FileChange, MergeRequest, MrUrl, NewNote, Note};

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

/// `<project>/merge_requests/<iid>`, tolerating the `/-/` scope segment.
static MR_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)(?:/-)?/merge_requests/(\d+)$").expect("merge request path pattern")
});

#[derive(Debug, Error)]
pub enum MrError {
    #[error("Invalid MR URL format: {0}")]
    InvalidUrl(String),
}

/// Parse a GitLab merge request URL into its component parts.
///
/// Accepts both `https://host/group/project/merge_requests/12` and the
/// newer `https://host/group/project/-/merge_requests/12`. Query strings and
/// fragments are ignored; anything after the number in the path is not.
pub fn parse_mr_url(url: &str) -> Result<MrUrl, MrError> {
    let invalid = || MrError::InvalidUrl(url.to_string());

    let parsed = reqwest::Url::parse(url).map_err(|_| invalid())?;
    let host = parsed.host_str().ok_or_else(invalid)?;
    let base_url = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };

    let captures = MR_PATH.captures(parsed.path()).ok_or_else(invalid)?;
    // parsed.path() is already percent-encoded; decode so the project is
    // encoded exactly once when composing API endpoints.
    let project_path =
        urlencoding::decode(captures[1].trim_matches('/')).map_err(|_| invalid())?;
    if project_path.is_empty() {
        return Err(invalid());
    }

    Ok(MrUrl {
        base_url,
        project_path: project_path.into_owned(),
        iid: captures[2].to_string(),
    })
}

/// Fetch merge request metadata (title, author, branches, state).
#[instrument(skip(client), fields(project = %mr.project_path, iid = %mr.iid))]
pub async fn fetch_merge_request(
    client: &GitLabClient,
    mr: &MrUrl,
) -> Result<MergeRequest, ApiError> {
    let info: MergeRequest = client.get(&mr.endpoint("")).await?;
    debug!(title = %info.title, state = %info.state, "received merge request");
    Ok(info)
}

/// Fetch the per-file changes of a merge request.
#[instrument(skip(client), fields(project = %mr.project_path, iid = %mr.iid))]
pub async fn fetch_changes(client: &GitLabClient, mr: &MrUrl) -> Result<Changes, ApiError> {
    let changes: Changes = client.get(&mr.endpoint("/changes")).await?;
    debug!(files = changes.changes.len(), "received changes");
    Ok(changes)
}

/// Post `body` as a new note on the merge request.
#[instrument(skip(client, body), fields(project = %mr.project_path, iid = %mr.iid, body_len = body.len()))]
pub async fn post_note(client: &GitLabClient, mr: &MrUrl, body: &str) -> Result<Note, ApiError> {
    let note: Note = client.post(&mr.endpoint("/notes"), &NewNote { body }).await?;
    debug!(note_id = ?note.id, "note created");
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_classic_mr_url() {
        let url = parse_mr_url("http://h/g/p/merge_requests/19").unwrap();
        assert_eq!(url.base_url, "http://h");
        assert_eq!(url.project_path, "g/p");
        assert_eq!(url.iid, "19");
    }

    #[test]
    fn test_parse_dash_scoped_mr_url() {
        let url = parse_mr_url("https://gitlab.example.com/a/b/-/merge_requests/123").unwrap();
        assert_eq!(url.base_url, "https://gitlab.example.com");
        assert_eq!(url.project_path, "a/b");
        assert_eq!(url.iid, "123");
    }

    #[test]
    fn test_parse_keeps_port_and_nested_groups() {
        let url = parse_mr_url("http://10.13.29.154:8080/grp/sub/proj/merge_requests/7").unwrap();
        assert_eq!(url.base_url, "http://10.13.29.154:8080");
        assert_eq!(url.project_path, "grp/sub/proj");
        assert_eq!(url.iid, "7");
    }

    #[test]
    fn test_parse_ignores_query_and_fragment() {
        let url = parse_mr_url("https://h/g/p/-/merge_requests/5?tab=diffs#note_1").unwrap();
        assert_eq!(url.project_path, "g/p");
        assert_eq!(url.iid, "5");
    }

    #[test]
    fn test_parse_keeps_iid_digits_verbatim() {
        let url = parse_mr_url("http://h/g/p/merge_requests/007").unwrap();
        assert_eq!(url.iid, "007");
        let url = parse_mr_url("http://h/g/p/merge_requests/123456789012345678901234567890").unwrap();
        assert_eq!(url.iid, "123456789012345678901234567890");
        assert_eq!(
            url.endpoint(""),
            "/projects/g%2Fp/merge_requests/123456789012345678901234567890"
        );
    }

    #[test]
    fn test_parse_decodes_project_path_once() {
        let url = parse_mr_url("http://h/my%20group/p\u{fc}/-/merge_requests/3").unwrap();
        assert_eq!(url.project_path, "my group/p\u{fc}");
        assert_eq!(url.encoded_project(), "my%20group%2Fp%C3%BC");
    }

    #[test]
    fn test_parse_invalid_mr_url() {
        assert!(parse_mr_url("not-a-url").is_err());
        assert!(parse_mr_url("https://h/g/p").is_err());
        assert!(parse_mr_url("https://h/g/p/merge_requests/").is_err());
        assert!(parse_mr_url("https://h/g/p/merge_requests/abc").is_err());
        assert!(parse_mr_url("https://h/g/p/merge_requests/12/diffs").is_err());
        assert!(parse_mr_url("https://h/merge_requests/12").is_err());
    }

    #[test]
    fn test_invalid_url_message() {
        let err = parse_mr_url("https://h/g/p/issues/3").unwrap_err();
        assert_eq!(err.to_string(), "Invalid MR URL format: https://h/g/p/issues/3");
    }

    fn mr_for(server: &MockServer) -> MrUrl {
        parse_mr_url(&format!("{}/g/p/merge_requests/19", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_merge_request_uses_encoded_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/g%2Fp/merge_requests/19"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "iid": 19,
                "title": "Add feature",
                "author": {"name": "Alice", "username": "alice"},
                "source_branch": "feature",
                "target_branch": "main",
                "state": "opened",
                "web_url": "http://h/g/p/merge_requests/19"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t").unwrap();
        let info = fetch_merge_request(&client, &mr_for(&server)).await.unwrap();
        assert_eq!(info.iid, 19);
        assert_eq!(info.title, "Add feature");
    }

    #[tokio::test]
    async fn test_fetch_changes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/g%2Fp/merge_requests/19/changes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "iid": 19,
                "changes": [
                    {"old_path": "a.rs", "new_path": "a.rs", "diff": "@@ -1 +1 @@\n-a\n+b\n"},
                    {"old_path": "img.png", "new_path": "img.png", "new_file": true, "diff": ""}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t").unwrap();
        let changes = fetch_changes(&client, &mr_for(&server)).await.unwrap();
        assert_eq!(changes.changes.len(), 2);
        assert!(changes.changes[1].new_file);
    }

    #[tokio::test]
    async fn test_post_note_tolerates_missing_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/g%2Fp/merge_requests/19/notes"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"body": "LGTM!"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t").unwrap();
        let note = post_note(&client, &mr_for(&server), "LGTM!").await.unwrap();
        assert!(note.id.is_none());
    }

    #[tokio::test]
    async fn test_post_note_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/g%2Fp/merge_requests/19/notes"))
            .and(body_json(json!({"body": "LGTM!"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42, "body": "LGTM!"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t").unwrap();
        let note = post_note(&client, &mr_for(&server), "LGTM!").await.unwrap();
        assert_eq!(note.id, Some(42));
    }
}
