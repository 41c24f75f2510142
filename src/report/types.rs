use crate::mr::FileChange;

/// How a file is touched by the merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    New,
    Deleted,
    Renamed,
    Modified,
}

impl FileStatus {
    /// Derive the status from GitLab's flags. A file flagged as both new and
    /// renamed is reported as new.
    pub fn of(change: &FileChange) -> Self {
        if change.new_file {
            FileStatus::New
        } else if change.deleted_file {
            FileStatus::Deleted
        } else if change.renamed_file {
            FileStatus::Renamed
        } else {
            FileStatus::Modified
        }
    }

    /// Path shown in the file list for a change with this status.
    pub fn display_path(self, change: &FileChange) -> String {
        let old_path = change.old_path.as_deref().unwrap_or("");
        let new_path = change.new_path.as_deref().unwrap_or("");
        match self {
            FileStatus::Deleted => old_path.to_string(),
            FileStatus::Renamed => format!("{} -> {}", old_path, new_path),
            FileStatus::New | FileStatus::Modified => new_path.to_string(),
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::New => write!(f, "[NEW]"),
            FileStatus::Deleted => write!(f, "[DEL]"),
            FileStatus::Renamed => write!(f, "[REN]"),
            FileStatus::Modified => write!(f, "[MOD]"),
        }
    }
}
