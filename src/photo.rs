//! Photo types flowing through the archive pipeline.

use std::fmt;
use std::str::FromStr;

/// One listed photo after its largest rendition has been chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePhoto {
    /// VK photo id.
    pub photo_id: i64,
    /// Likes count at listing time.
    pub likes: u64,
    /// URL of the largest rendition.
    pub url: String,
    /// VK size type letter of that rendition (`s`, `m`, `x`, `w`, ...).
    pub rendition_type: String,
}

impl SourcePhoto {
    /// Returns the raw identifier used to name this photo under `key`.
    #[must_use]
    pub fn raw_id(&self, key: NamingKey) -> String {
        match key {
            NamingKey::Likes => self.likes.to_string(),
            NamingKey::PhotoId => self.photo_id.to_string(),
        }
    }
}

/// Which photo field becomes the base of its display name.
///
/// `Likes` reproduces the historical naming scheme: the likes count doubles as
/// the file name, so photos with equal counts collide and get a date suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingKey {
    /// Name photos by their likes count.
    #[default]
    Likes,
    /// Name photos by their VK photo id.
    PhotoId,
}

impl NamingKey {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::PhotoId => "id",
        }
    }
}

impl fmt::Display for NamingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "likes" => Ok(Self::Likes),
            "id" | "photo_id" => Ok(Self::PhotoId),
            other => Err(format!(
                "unknown naming key '{other}', expected 'likes' or 'id'"
            )),
        }
    }
}

/// A photo with its final display name, ready to be recorded and uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Name used for both the manifest entry and the remote file.
    pub display_name: String,
    /// URL the storage provider fetches the photo from.
    pub source_url: String,
    /// VK size type letter of the chosen rendition.
    pub rendition_type: String,
}

/// Builds `<folder>/<display_name>.jpg`.
#[must_use]
pub fn remote_photo_path(folder: &str, display_name: &str) -> String {
    format!("{}/{display_name}.jpg", folder.trim_end_matches('/'))
}
