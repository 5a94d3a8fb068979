//! Port for reading files confined to the uploads directory.
use async_trait::async_trait;

use crate::domain::DownloadPath;

use super::define_port_error;

define_port_error! {
    /// Errors raised by file stores.
    pub enum FileStoreError {
        /// No regular file exists at the path.
        NotFound => "file not found",
        /// The path resolves outside the store, for example via a symlink.
        Escape => "path escapes the uploads directory",
        /// Any other I/O failure.
        Io { message: String } => "file store I/O failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read the whole file at `path`.
    async fn read(&self, path: &DownloadPath) -> Result<Vec<u8>, FileStoreError>;
}
