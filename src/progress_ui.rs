//! Progress bars for archive runs.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use photo_archiver_core::{Progress, Stage};

/// Decides whether bars are drawn at all.
pub(crate) fn should_show_progress(stderr_is_terminal: bool, quiet: bool) -> bool {
    stderr_is_terminal && !quiet
}

/// One indicatif bar per pipeline stage, shown while that stage runs.
pub(crate) struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Progress for BarProgress {
    fn stage_started(&self, stage: Stage, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg}: {percent:>3}%|{bar:30}| {pos}/{len} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(stage.label());
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn advance(&self, _stage: Stage, delta: u64) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            bar.inc(delta);
        }
    }

    fn stage_finished(&self, _stage: Stage) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish();
        }
    }
}
