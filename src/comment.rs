use crate::mr::Note;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment cannot be empty")]
    Empty,
}

/// Reject comments that are empty or whitespace only.
pub fn validate(body: &str) -> Result<(), CommentError> {
    if body.trim().is_empty() {
        return Err(CommentError::Empty);
    }
    Ok(())
}

/// Confirmation printed after a note is created, ending with a link to the
/// note anchor on the merge request page. Without an id the link points at
/// the merge request itself.
pub fn confirmation(mr_url: &str, note: &Note) -> String {
    match note.id {
        Some(id) => format!(
            "Comment posted successfully!\nComment ID: {id}\nURL: {mr_url}#note_{id}"
        ),
        None => format!("Comment posted successfully!\nURL: {mr_url}"),
    }
}
