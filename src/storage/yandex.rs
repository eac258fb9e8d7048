//! Yandex Disk storage target.
//!
//! Photos are never streamed through the archiver: each upload hands Yandex
//! Disk a source URL and the service fetches the file server-side. The call
//! answers `202 Accepted` with a link to the asynchronous operation.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{FolderStatus, StorageTarget, UploadOutcome};
use crate::gateway::{ApiError, ApiRequest, CONFLICT, HttpGateway, display_url};
use crate::photo::remote_photo_path;
use crate::throttle::{DEFAULT_UPLOAD_INTERVAL, Throttle};

/// Default Yandex Disk REST API base URL.
pub const DEFAULT_DISK_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk";

/// Remote folder photos are archived into.
pub const DEFAULT_FOLDER: &str = "photos";

/// Link object returned by `resources/upload`.
#[derive(Debug, Deserialize)]
pub(crate) struct OperationLink {
    pub href: String,
}

/// Archives photos into one Yandex Disk folder.
pub struct YandexDisk {
    gateway: HttpGateway,
    oauth_token: String,
    folder: String,
    throttle: Throttle,
}

impl YandexDisk {
    /// Creates a client against the public Yandex Disk API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    pub fn new(oauth_token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(oauth_token, DEFAULT_DISK_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    pub fn with_base_url(
        oauth_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            gateway: HttpGateway::new(base_url)?,
            oauth_token: oauth_token.into(),
            folder: DEFAULT_FOLDER.to_string(),
            throttle: Throttle::new(DEFAULT_UPLOAD_INTERVAL),
        })
    }

    /// Overrides the remote folder name.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Replaces the per-upload pacing throttle.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Returns the remote folder name.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    fn authorized(&self, request: ApiRequest) -> ApiRequest {
        request.header(AUTHORIZATION, format!("OAuth {}", self.oauth_token))
    }

    /// Creates the remote folder, treating "already exists" as success.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for any failure other than `409 Conflict`.
    #[instrument(skip(self), fields(folder = %self.folder))]
    pub async fn ensure_folder(&self) -> Result<FolderStatus, ApiError> {
        let request = self
            .authorized(ApiRequest::put("resources"))
            .query("path", &self.folder)
            .tolerate_conflict();

        let response = self.gateway.send(request).await?;
        if response.status().as_u16() == CONFLICT {
            debug!("remote folder already exists");
            Ok(FolderStatus::AlreadyExists)
        } else {
            info!("remote folder created");
            Ok(FolderStatus::Created)
        }
    }

    /// Asks Yandex Disk to fetch `source_url` into `<folder>/<display_name>.jpg`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for any failure other than `409 Conflict`, which
    /// means a file already sits at the target path.
    #[instrument(skip(self, source_url), fields(folder = %self.folder))]
    pub async fn upload(
        &self,
        display_name: &str,
        source_url: &str,
    ) -> Result<UploadOutcome, ApiError> {
        self.throttle.acquire().await;

        let remote_path = remote_photo_path(&self.folder, display_name);
        let request = self
            .authorized(ApiRequest::post("resources/upload"))
            .query("path", &remote_path)
            .query("url", source_url)
            .tolerate_conflict();

        let response = self.gateway.send(request).await?;
        if response.status().as_u16() == CONFLICT {
            warn!(path = %remote_path, "remote file already exists, skipping");
            return Ok(UploadOutcome::AlreadyExists);
        }

        let endpoint = display_url(response.url());
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(&endpoint, e))?;
        let operation_href = serde_json::from_str::<OperationLink>(&body)
            .ok()
            .map(|link| link.href);

        debug!(path = %remote_path, operation = ?operation_href, "upload accepted");
        Ok(UploadOutcome::Accepted { operation_href })
    }
}

impl std::fmt::Debug for YandexDisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexDisk")
            .field("base_url", &self.gateway.base_url())
            .field("folder", &self.folder)
            .field("throttle_interval", &self.throttle.interval())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageTarget for YandexDisk {
    async fn ensure_folder(&self) -> Result<FolderStatus, ApiError> {
        YandexDisk::ensure_folder(self).await
    }

    async fn upload(&self, display_name: &str, source_url: &str) -> Result<UploadOutcome, ApiError> {
        YandexDisk::upload(self, display_name, source_url).await
    }
}
