//! The archive run: list, name, record, upload.
//!
//! [`archive_profile_photos`] executes one run end to end:
//!
//! 1. list photos from the [`PhotoSource`]
//! 2. assign display names with a [`NameDeduper`] for `today`, pacing each
//!    photo by [`ArchiveOptions::item_delay`]
//! 3. write the manifest through the [`ManifestWriter`]
//! 4. make sure the storage folder exists
//! 5. upload every record, in order
//!
//! Each step completes before the next begins. The first error ends the run;
//! photos uploaded and the manifest written before that point stay as they
//! are.

use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, instrument};

use crate::gateway::ApiError;
use crate::manifest::{ManifestEntry, ManifestError, ManifestWriter};
use crate::naming::NameDeduper;
use crate::photo::{NamingKey, PhotoRecord};
use crate::progress::{Progress, Stage};
use crate::source::{DEFAULT_PHOTO_COUNT, PhotoSource};
use crate::storage::{StorageTarget, UploadOutcome};
use crate::throttle::{DEFAULT_SOURCE_INTERVAL, Throttle};

/// Errors that end an archive run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A VK or Yandex Disk call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The manifest could not be written.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Maximum number of photos to list.
    pub count: u32,
    /// Field photos are named after.
    pub naming_key: NamingKey,
    /// Minimum time between two named photos; zero disables pacing.
    pub item_delay: Duration,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_PHOTO_COUNT,
            naming_key: NamingKey::default(),
            item_delay: DEFAULT_SOURCE_INTERVAL,
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Named photos, in source order.
    pub records: Vec<PhotoRecord>,
    /// Manifest rows written, aligned with `records`.
    pub manifest: Vec<ManifestEntry>,
    /// Uploads the provider accepted.
    pub uploaded: usize,
    /// Uploads skipped because the file already existed remotely.
    pub already_present: usize,
}

/// Runs one archive pass.
///
/// # Errors
///
/// Returns [`ArchiveError::Api`] for the first failing remote call and
/// [`ArchiveError::Manifest`] if the manifest cannot be written.
#[instrument(skip_all, fields(count = options.count, naming_key = %options.naming_key, %today))]
pub async fn archive_profile_photos(
    source: &dyn PhotoSource,
    storage: &dyn StorageTarget,
    manifest: &ManifestWriter,
    options: &ArchiveOptions,
    today: NaiveDate,
    progress: &dyn Progress,
) -> Result<ArchiveSummary, ArchiveError> {
    let photos = source.list_profile_photos(options.count).await?;

    progress.stage_started(Stage::CollectNames, photos.len() as u64);
    let pacing = Throttle::new(options.item_delay);
    let mut deduper = NameDeduper::new(today);
    let mut records = Vec::with_capacity(photos.len());
    for photo in photos {
        pacing.acquire().await;
        let display_name = deduper.assign(&photo.raw_id(options.naming_key));
        records.push(PhotoRecord {
            display_name,
            source_url: photo.url,
            rendition_type: photo.rendition_type,
        });
        progress.advance(Stage::CollectNames, 1);
    }
    progress.stage_finished(Stage::CollectNames);

    progress.stage_started(Stage::WriteManifest, records.len() as u64);
    let entries = manifest.write(&records).await?;
    progress.advance(Stage::WriteManifest, entries.len() as u64);
    progress.stage_finished(Stage::WriteManifest);

    storage.ensure_folder().await?;

    progress.stage_started(Stage::Upload, records.len() as u64);
    let mut uploaded = 0;
    let mut already_present = 0;
    for record in &records {
        match storage
            .upload(&record.display_name, &record.source_url)
            .await?
        {
            UploadOutcome::Accepted { .. } => uploaded += 1,
            UploadOutcome::AlreadyExists => already_present += 1,
        }
        progress.advance(Stage::Upload, 1);
    }
    progress.stage_finished(Stage::Upload);

    info!(
        photos = records.len(),
        uploaded,
        already_present,
        manifest = %manifest.path().display(),
        "archive run complete"
    );

    Ok(ArchiveSummary {
        records,
        manifest: entries,
        uploaded,
        already_present,
    })
}
