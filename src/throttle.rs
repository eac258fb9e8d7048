//! Fixed-interval pacing for sequential API calls.
//!
//! [`Throttle`] enforces a minimum interval between successive
//! [`Throttle::acquire`] calls. The archive run paces each listed photo and
//! every VK call with one, the storage target paces uploads with another.
//!
//! Waiting goes through `tokio::time`, so tests can pause the runtime clock
//! and assert on elapsed virtual time without real delays.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use photo_archiver_core::throttle::Throttle;
//!
//! # async fn example() {
//! let throttle = Throttle::new(Duration::from_millis(75));
//!
//! // First call proceeds immediately
//! throttle.acquire().await;
//!
//! // Second call waits until 75ms have passed since the first
//! throttle.acquire().await;
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Warning threshold for cumulative pacing delay (30 seconds).
const CUMULATIVE_DELAY_WARNING_THRESHOLD: Duration = Duration::from_secs(30);

/// Default interval between photo listing items.
pub const DEFAULT_SOURCE_INTERVAL: Duration = Duration::from_millis(75);

/// Default interval between uploads.
pub const DEFAULT_UPLOAD_INTERVAL: Duration = Duration::from_millis(10);

/// Minimum-interval pacer.
#[derive(Debug)]
pub struct Throttle {
    /// Minimum time between two acquisitions.
    interval: Duration,

    /// Whether pacing is disabled (interval of 0).
    disabled: bool,

    /// Time of the previous acquisition, `None` until the first one.
    last_acquire: Mutex<Option<Instant>>,

    /// Total delay applied so far, in milliseconds.
    cumulative_delay_ms: AtomicU64,
}

impl Throttle {
    /// Creates a throttle with the given minimum interval.
    #[must_use]
    #[instrument(skip_all, fields(interval_ms = interval.as_millis()))]
    pub fn new(interval: Duration) -> Self {
        debug!("creating throttle");
        Self {
            interval,
            disabled: interval.is_zero(),
            last_acquire: Mutex::new(None),
            cumulative_delay_ms: AtomicU64::new(0),
        }
    }

    /// Creates a throttle from a millisecond interval; `0` disables pacing.
    #[must_use]
    pub fn from_millis(interval_ms: u64) -> Self {
        if interval_ms == 0 {
            Self::disabled()
        } else {
            Self::new(Duration::from_millis(interval_ms))
        }
    }

    /// Creates a throttle that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            interval: Duration::ZERO,
            disabled: true,
            last_acquire: Mutex::new(None),
            cumulative_delay_ms: AtomicU64::new(0),
        }
    }

    /// Returns the minimum interval between acquisitions.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the total delay this throttle has imposed so far.
    #[must_use]
    pub fn total_delay(&self) -> Duration {
        Duration::from_millis(self.cumulative_delay_ms.load(Ordering::SeqCst))
    }

    /// Waits until at least [`Throttle::interval`] has passed since the
    /// previous acquisition. The first acquisition never waits.
    pub async fn acquire(&self) {
        if self.disabled {
            return;
        }

        let mut last_guard = self.last_acquire.lock().await;

        if let Some(last) = *last_guard {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let delay = self.interval.saturating_sub(elapsed);
                let cumulative = self.add_cumulative_delay(delay);

                debug!(
                    delay_ms = delay.as_millis(),
                    cumulative_ms = cumulative.as_millis(),
                    "applying pacing delay"
                );

                if cumulative >= CUMULATIVE_DELAY_WARNING_THRESHOLD
                    && cumulative.saturating_sub(delay) < CUMULATIVE_DELAY_WARNING_THRESHOLD
                {
                    warn!(
                        cumulative_delay_secs = cumulative.as_secs(),
                        "pacing delay is adding up - consider a shorter interval"
                    );
                }

                tokio::time::sleep(delay).await;
            }
        }

        *last_guard = Some(Instant::now());
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_cumulative_delay(&self, delay: Duration) -> Duration {
        let delay_ms = delay.as_millis() as u64;
        let new_total = self
            .cumulative_delay_ms
            .fetch_add(delay_ms, Ordering::SeqCst)
            + delay_ms;
        Duration::from_millis(new_total)
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::disabled()
    }
}
