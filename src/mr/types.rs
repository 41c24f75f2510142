use serde::{Deserialize, Serialize};

/// Represents the parsed components of a GitLab merge request URL.
/// Extracted by parse_mr_url() in mr/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrUrl {
    /// Scheme and host of the instance (e.g., "https://gitlab.example.com")
    pub base_url: String,
    /// Namespace and project, percent-decoded (e.g., "group/subgroup/project")
    pub project_path: String,
    /// Project-scoped merge request number, exactly as written in the URL
    pub iid: String,
}

impl MrUrl {
    /// The project path as a single path segment, with `/` and every other
    /// reserved character percent-encoded.
    pub fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }

    /// API endpoint for this merge request, relative to `/api/v4`.
    pub fn endpoint(&self, suffix: &str) -> String {
        format!(
            "/projects/{}/merge_requests/{}{}",
            self.encoded_project(),
            self.iid,
            suffix
        )
    }
}

/// Merge request metadata from `GET /projects/:id/merge_requests/:iid`.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    pub author: Author,
    pub source_branch: String,
    pub target_branch: String,
    /// opened, closed, locked or merged
    pub state: String,
    pub web_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: String,
    pub username: String,
}

/// Response body of `GET /projects/:id/merge_requests/:iid/changes`.
/// Only the file list is used; the rest of the merge request is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changes {
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

/// A single file within the merge request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileChange {
    #[serde(default)]
    pub old_path: Option<String>,
    #[serde(default)]
    pub new_path: Option<String>,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
    /// Unified diff text. Absent or empty for binary files and oversized diffs.
    #[serde(default)]
    pub diff: Option<String>,
}

/// Payload for `POST /projects/:id/merge_requests/:iid/notes`.
#[derive(Debug, Clone, Serialize)]
pub struct NewNote<'a> {
    pub body: &'a str,
}

/// The note GitLab created. Only the id is needed to build the anchor link.
/// The note already exists once a 2xx arrives, so a missing id is tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_url() -> MrUrl {
        MrUrl {
            base_url: "http://h".to_string(),
            project_path: "g/sub/p".to_string(),
            iid: "19".to_string(),
        }
    }

    #[test]
    fn test_encoded_project_escapes_slashes() {
        assert_eq!(sample_url().encoded_project(), "g%2Fsub%2Fp");
    }

    #[test]
    fn test_endpoint_composition() {
        let url = sample_url();
        assert_eq!(url.endpoint(""), "/projects/g%2Fsub%2Fp/merge_requests/19");
        assert_eq!(
            url.endpoint("/changes"),
            "/projects/g%2Fsub%2Fp/merge_requests/19/changes"
        );
    }

    #[test]
    fn test_file_change_defaults_missing_fields() {
        let change: FileChange = serde_json::from_str(r#"{"new_path": "a.rs"}"#).unwrap();
        assert_eq!(change.new_path.as_deref(), Some("a.rs"));
        assert!(change.old_path.is_none());
        assert!(!change.new_file && !change.deleted_file && !change.renamed_file);
        assert!(change.diff.is_none());
    }

    #[test]
    fn test_merge_request_null_description() {
        let json = r#"{
            "iid": 7, "title": "Fix", "state": "opened",
            "author": {"name": "Alice", "username": "alice"},
            "source_branch": "fix", "target_branch": "main",
            "web_url": "http://h/g/p/-/merge_requests/7",
            "description": null
        }"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.iid, 7);
        assert_eq!(mr.author.username, "alice");
        assert!(mr.description.is_none());
    }

    #[test]
    fn test_encoded_project_escapes_space_and_non_ascii() {
        let url = MrUrl {
            project_path: "my group/p\u{fc}".to_string(),
            ..sample_url()
        };
        assert_eq!(url.encoded_project(), "my%20group%2Fp%C3%BC");
    }

    #[test]
    fn test_note_without_id() {
        let note: Note = serde_json::from_str(r#"{"body": "LGTM!"}"#).unwrap();
        assert!(note.id.is_none());
        let note: Note = serde_json::from_str(r#"{"id": 42, "body": "LGTM!"}"#).unwrap();
        assert_eq!(note.id, Some(42));
    }

    #[test]
    fn test_new_note_serializes_body() {
        let body = serde_json::to_value(NewNote { body: "LGTM!" }).unwrap();
        assert_eq!(body, serde_json::json!({"body": "LGTM!"}));
    }
}
