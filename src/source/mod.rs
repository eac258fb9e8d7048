//! Photo sources feeding the archive pipeline.
//!
//! - [`PhotoSource`] - async trait the pipeline lists photos through
//! - [`VkClient`] - VK implementation (`photos.get` on the profile album)

mod vk;

pub use vk::{
    DEFAULT_API_VERSION, DEFAULT_PHOTO_COUNT, DEFAULT_VK_BASE_URL, VkClient, VkUser,
};

use async_trait::async_trait;

use crate::gateway::ApiError;
use crate::photo::SourcePhoto;

/// Lists photos to archive, largest rendition already chosen.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Returns up to `count` photos in source order.
    async fn list_profile_photos(&self, count: u32) -> Result<Vec<SourcePhoto>, ApiError>;
}
