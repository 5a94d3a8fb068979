//! `FileStore` adapter confined to one directory through `cap_std`.
//!
//! All opens are relative to a directory capability. `cap_std` refuses any
//! resolution that leaves that directory, including through symlinks, so the
//! store cannot read outside the uploads root even if a path slipped past
//! validation.

use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::warn;

use crate::domain::DownloadPath;
use crate::domain::ports::{FileStore, FileStoreError};

/// Read-only view of the uploads directory.
#[derive(Clone)]
pub struct CapStdFileStore {
    root: Arc<Dir>,
}

impl CapStdFileStore {
    /// Open (creating if needed) the uploads directory at `path`.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

fn map_io_error(error: &io::Error, path: &Path) -> FileStoreError {
    match error.kind() {
        io::ErrorKind::NotFound => FileStoreError::not_found(),
        io::ErrorKind::PermissionDenied => {
            warn!(path = %path.display(), "download resolved outside the uploads directory");
            FileStoreError::escape()
        }
        _ => FileStoreError::io(error.to_string()),
    }
}

fn read_confined(root: &Dir, path: &Path) -> Result<Vec<u8>, FileStoreError> {
    let mut file = root.open(path).map_err(|err| map_io_error(&err, path))?;
    let metadata = file.metadata().map_err(|err| map_io_error(&err, path))?;
    if !metadata.is_file() {
        return Err(FileStoreError::not_found());
    }
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|err| map_io_error(&err, path))?;
    Ok(bytes)
}

#[async_trait]
impl FileStore for CapStdFileStore {
    async fn read(&self, path: &DownloadPath) -> Result<Vec<u8>, FileStoreError> {
        let root = Arc::clone(&self.root);
        let path = path.as_path().to_path_buf();
        tokio::task::spawn_blocking(move || read_confined(&root, &path))
            .await
            .map_err(|err| FileStoreError::io(format!("file task failed: {err}")))?
    }
}
