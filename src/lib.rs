//! Photo Archiver Core Library
//!
//! This library archives a VK user's profile photos to Yandex Disk and keeps
//! a local JSON manifest of what was archived.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`gateway`] - HTTP requests against an API base URL with typed failures
//! - [`source`] - Photo listing ([`source::VkClient`])
//! - [`naming`] - Display names with date-suffixed collisions
//! - [`manifest`] - `photos_info.json` writer
//! - [`storage`] - Upload-by-URL target ([`storage::YandexDisk`])
//! - [`throttle`] - Fixed-interval pacing between calls
//! - [`pipeline`] - The end-to-end archive run
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use photo_archiver_core::{
//!     ArchiveOptions, ManifestWriter, NoProgress, VkClient, YandexDisk, archive_profile_photos,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = VkClient::new("vk-token", 1)?;
//! let storage = YandexDisk::new("disk-token")?;
//! let manifest = ManifestWriter::new("photos_info.json");
//!
//! let summary = archive_profile_photos(
//!     &source,
//!     &storage,
//!     &manifest,
//!     &ArchiveOptions::default(),
//!     Local::now().date_naive(),
//!     &NoProgress,
//! )
//! .await?;
//! println!("archived {} photos", summary.records.len());
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod gateway;
pub mod manifest;
pub mod naming;
pub mod photo;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod storage;
pub mod throttle;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use gateway::{ApiError, ApiRequest, HttpGateway};
pub use manifest::{DEFAULT_MANIFEST_PATH, ManifestEntry, ManifestError, ManifestWriter, read_manifest};
pub use naming::{NameDeduper, assign_names};
pub use photo::{NamingKey, PhotoRecord, SourcePhoto};
pub use pipeline::{ArchiveError, ArchiveOptions, ArchiveSummary, archive_profile_photos};
pub use progress::{NoProgress, Progress, Stage};
pub use source::{DEFAULT_API_VERSION, DEFAULT_PHOTO_COUNT, PhotoSource, VkClient, VkUser};
pub use storage::{DEFAULT_FOLDER, FolderStatus, StorageTarget, UploadOutcome, YandexDisk};
pub use throttle::Throttle;
