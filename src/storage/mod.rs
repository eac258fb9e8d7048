//! Remote storage targets photos are archived into.
//!
//! - [`StorageTarget`] - async trait the pipeline uploads through
//! - [`YandexDisk`] - Yandex Disk implementation (upload by source URL)

mod yandex;

pub use yandex::{DEFAULT_DISK_BASE_URL, DEFAULT_FOLDER, YandexDisk};

use async_trait::async_trait;

use crate::gateway::ApiError;

/// Result of making sure the target folder exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    /// The folder was created by this call.
    Created,
    /// The folder was already there.
    AlreadyExists,
}

/// Result of a single upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The provider accepted the fetch; `operation_href` tracks it when given.
    Accepted {
        /// Link to the provider's asynchronous operation status.
        operation_href: Option<String>,
    },
    /// A file already existed at the target path.
    AlreadyExists,
}

/// Destination for archived photos.
#[async_trait]
pub trait StorageTarget: Send + Sync {
    /// Creates the destination folder if needed.
    async fn ensure_folder(&self) -> Result<FolderStatus, ApiError>;

    /// Stores the photo at `source_url` under `display_name`.
    async fn upload(&self, display_name: &str, source_url: &str) -> Result<UploadOutcome, ApiError>;
}
