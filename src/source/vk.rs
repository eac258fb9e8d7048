//! VK photo source - lists a user's profile photos via the VK API.
//!
//! The [`VkClient`] calls `photos.get` for the owner's `profile` album with
//! `photo_sizes=1`, so each item carries every available rendition ordered
//! smallest to largest. The last rendition is the one archived.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::PhotoSource;
use crate::gateway::{ApiError, ApiRequest, HttpGateway};
use crate::photo::SourcePhoto;
use crate::throttle::{DEFAULT_SOURCE_INTERVAL, Throttle};

/// Default VK API base URL.
pub const DEFAULT_VK_BASE_URL: &str = "https://api.vk.com/method";

/// VK API version sent with every call.
pub const DEFAULT_API_VERSION: &str = "5.199";

/// Number of photos fetched when the caller does not say otherwise.
pub const DEFAULT_PHOTO_COUNT: u32 = 5;

// ==================== VK API Response Types ====================

/// Top-level VK response: either `response` or `error` is present.
#[derive(Debug, Deserialize)]
pub(crate) struct VkEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<VkErrorBody>,
}

/// The `error` object VK returns with HTTP 200.
#[derive(Debug, Deserialize)]
pub(crate) struct VkErrorBody {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// The `response` object of `photos.get`.
#[derive(Debug, Deserialize)]
pub(crate) struct PhotosPage {
    #[serde(default)]
    pub count: u64,
    pub items: Vec<VkPhoto>,
}

/// One photo item with `extended=1` and `photo_sizes=1`.
#[derive(Debug, Deserialize)]
pub(crate) struct VkPhoto {
    #[serde(default)]
    pub id: i64,
    pub likes: VkLikes,
    #[serde(default)]
    pub sizes: Vec<VkPhotoSize>,
}

/// The `likes` object of an extended photo item.
#[derive(Debug, Deserialize)]
pub(crate) struct VkLikes {
    pub count: u64,
}

/// One rendition of a photo.
#[derive(Debug, Deserialize)]
pub(crate) struct VkPhotoSize {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Basic profile data returned by `users.get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VkUser {
    /// VK user id.
    pub id: i64,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
}

// ==================== VkClient ====================

/// Lists profile photos of one VK user.
pub struct VkClient {
    gateway: HttpGateway,
    access_token: String,
    owner_id: i64,
    api_version: String,
    throttle: Throttle,
}

impl VkClient {
    /// Creates a client against the public VK API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    pub fn new(access_token: impl Into<String>, owner_id: i64) -> Result<Self, ApiError> {
        Self::with_base_url(access_token, owner_id, DEFAULT_VK_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    pub fn with_base_url(
        access_token: impl Into<String>,
        owner_id: i64,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            gateway: HttpGateway::new(base_url)?,
            access_token: access_token.into(),
            owner_id,
            api_version: DEFAULT_API_VERSION.to_string(),
            throttle: Throttle::new(DEFAULT_SOURCE_INTERVAL),
        })
    }

    /// Overrides the VK API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Replaces the throttle that paces VK method calls.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Returns the owner whose photos are listed.
    #[must_use]
    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    /// Returns the VK API version in use.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Fetches the owner's name via `users.get`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on HTTP failure, a VK error body, or an empty
    /// user list.
    #[instrument(skip(self), fields(owner_id = self.owner_id))]
    pub async fn user_info(&self) -> Result<VkUser, ApiError> {
        let request = self
            .authorized(ApiRequest::get("users.get"))
            .query("user_ids", self.owner_id);
        let users: Vec<VkUser> = self.call(request, "users.get").await?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::unexpected_response("users.get", "empty user list"))
    }

    /// Lists up to `count` profile photos, newest first, each reduced to its
    /// largest rendition.
    ///
    /// # Errors
    ///
    /// - [`ApiError::HttpStatus`] if VK answers with an error status
    /// - [`ApiError::Vk`] if VK reports a method error
    /// - [`ApiError::MissingRendition`] if an item has no sizes
    /// - [`ApiError::Decode`] if an item lacks `likes`
    #[instrument(skip(self), fields(owner_id = self.owner_id))]
    pub async fn list_profile_photos(&self, count: u32) -> Result<Vec<SourcePhoto>, ApiError> {
        let request = self
            .authorized(ApiRequest::get("photos.get"))
            .query("owner_id", self.owner_id)
            .query("album_id", "profile")
            .query("rev", 1)
            .query("extended", 1)
            .query("photo_sizes", 1)
            .query("count", count);

        let page: PhotosPage = self.call(request, "photos.get").await?;
        debug!(total = page.count, returned = page.items.len(), "photo page received");

        let photos = page
            .items
            .into_iter()
            .map(largest_rendition)
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            count = photos.len(),
            paced_ms = self.throttle.total_delay().as_millis(),
            "listed profile photos"
        );
        Ok(photos)
    }

    fn authorized(&self, request: ApiRequest) -> ApiRequest {
        request
            .query("access_token", &self.access_token)
            .query("v", &self.api_version)
    }

    async fn call<T>(&self, request: ApiRequest, method: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.throttle.acquire().await;
        let envelope: VkEnvelope<T> = self.gateway.send_json(request).await?;
        if let Some(error) = envelope.error {
            debug!(method, code = error.error_code, "VK method error");
            return Err(ApiError::Vk {
                code: error.error_code,
                message: error.error_msg,
            });
        }
        envelope
            .response
            .ok_or_else(|| ApiError::unexpected_response(method, "missing `response` field"))
    }
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("base_url", &self.gateway.base_url())
            .field("owner_id", &self.owner_id)
            .field("api_version", &self.api_version)
            .field("throttle_interval", &self.throttle.interval())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PhotoSource for VkClient {
    async fn list_profile_photos(&self, count: u32) -> Result<Vec<SourcePhoto>, ApiError> {
        VkClient::list_profile_photos(self, count).await
    }
}

/// Reduces a photo item to its last (largest) rendition.
fn largest_rendition(item: VkPhoto) -> Result<SourcePhoto, ApiError> {
    let VkPhoto { id, likes, sizes } = item;
    let largest = sizes
        .into_iter()
        .last()
        .ok_or(ApiError::MissingRendition { photo_id: id })?;
    Ok(SourcePhoto {
        photo_id: id,
        likes: likes.count,
        url: largest.url,
        rendition_type: largest.kind,
    })
}
