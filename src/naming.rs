//! Display-name assignment for listed photos.
//!
//! The first photo with a given raw identifier is named after the identifier
//! itself. Any later photo with the same identifier gets the run date
//! appended: `"<id>(<YYYY-MM-DD>)"`. Only raw identifiers are remembered, so a
//! third photo with the same identifier on the same day receives the same
//! suffixed name as the second one.

use std::collections::HashSet;
use std::fmt::Display;

use chrono::NaiveDate;
use tracing::debug;

/// Assigns display names within a single run.
#[derive(Debug, Clone)]
pub struct NameDeduper {
    today: NaiveDate,
    seen: HashSet<String>,
}

impl NameDeduper {
    /// Creates a deduper that suffixes collisions with `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            seen: HashSet::new(),
        }
    }

    /// Returns the date used for collision suffixes.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Assigns a display name to one raw identifier.
    pub fn assign(&mut self, raw_id: &str) -> String {
        if self.seen.insert(raw_id.to_string()) {
            raw_id.to_string()
        } else {
            let name = format!("{raw_id}({})", self.today);
            debug!(raw_id, name = %name, "name collision, appending date");
            name
        }
    }

    /// Assigns display names to a sequence of raw identifiers, in order.
    pub fn assign_names<I, T>(&mut self, raw_ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        raw_ids
            .into_iter()
            .map(|raw_id| self.assign(&raw_id.to_string()))
            .collect()
    }
}

/// Assigns display names to `raw_ids` using a fresh deduper for `today`.
#[must_use]
pub fn assign_names<I, T>(raw_ids: I, today: NaiveDate) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    NameDeduper::new(today).assign_names(raw_ids)
}
