//! Shared User-Agent string for every API request the archiver sends.

/// Default User-Agent for VK and Yandex Disk requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("photo-archiver/{version} (photo-backup-tool)")
}
