//! Relative paths for files served from the uploads directory.

use std::path::{Component, Path, PathBuf};

/// Maximum accepted path length, in bytes.
pub const DOWNLOAD_PATH_MAX: usize = 255;

/// Reasons a requested download path is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadPathError {
    #[error("file must not be empty")]
    Empty,
    #[error("file must be at most {max} bytes")]
    TooLong { max: usize },
    #[error("file must be a relative path inside the uploads directory")]
    Traversal,
}

/// Path made solely of normal components, relative to the uploads root.
///
/// ## Invariants
/// - No root, prefix, `.` or `..` components.
/// - No empty segments, NUL bytes or backslashes.
///
/// # Examples
/// ```
/// use bastion::domain::DownloadPath;
///
/// assert!(DownloadPath::parse("reports/q1.pdf").is_ok());
/// assert!(DownloadPath::parse("../../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPath(PathBuf);

impl DownloadPath {
    pub fn parse(raw: &str) -> Result<Self, DownloadPathError> {
        if raw.is_empty() {
            return Err(DownloadPathError::Empty);
        }
        if raw.len() > DOWNLOAD_PATH_MAX {
            return Err(DownloadPathError::TooLong {
                max: DOWNLOAD_PATH_MAX,
            });
        }
        // Path::components silently drops interior `.` segments, so check the
        // raw segments as well.
        let bad_segment = raw
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
        if raw.contains(['\0', '\\']) || bad_segment {
            return Err(DownloadPathError::Traversal);
        }
        let path = Path::new(raw);
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(DownloadPathError::Traversal);
        }
        Ok(Self(path.to_path_buf()))
    }

    pub fn as_path(&self) -> &Path {
        self.0.as_path()
    }

    /// Final component, used for the attachment filename.
    pub fn file_name(&self) -> &str {
        self.0
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("download")
    }
}
