//! Progress reporting hooks for the archive pipeline.

/// Pipeline stage a progress event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Assigning display names to listed photos.
    CollectNames,
    /// Writing the local manifest.
    WriteManifest,
    /// Uploading photos to storage.
    Upload,
}

impl Stage {
    /// Human-readable label for progress output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CollectNames => "Get names and urls",
            Self::WriteManifest => "Make a json file",
            Self::Upload => "Uploading photos",
        }
    }
}

/// Receives progress events. All methods default to doing nothing.
pub trait Progress: Send + Sync {
    /// A stage with `total` steps is starting.
    fn stage_started(&self, _stage: Stage, _total: u64) {}

    /// `delta` steps of `stage` completed.
    fn advance(&self, _stage: Stage, _delta: u64) {}

    /// `stage` completed.
    fn stage_finished(&self, _stage: Stage) {}
}

/// Progress sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}
