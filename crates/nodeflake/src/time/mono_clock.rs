use crate::{DEFAULT_EPOCH, TimeSource};
use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic time source that returns elapsed time since construction,
/// offset from a user-defined epoch.
///
/// This avoids wall-clock adjustments (e.g., NTP corrections) while still
/// aligning timestamps to a fixed origin: the offset between the wall clock
/// and the epoch is sampled once, and every reading adds `Instant::elapsed()`
/// to it. Readings never go backward.
///
/// Clones share the same anchor, so generators built from clones of one clock
/// agree on the current millisecond.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64, // in milliseconds
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) as the origin.
    ///
    /// If the wall clock is earlier than `epoch` at construction, the clock
    /// starts counting from `0`.
    ///
    /// # Example
    ///
    /// ```
    /// use nodeflake::{MonotonicClock, TimeSource, DEFAULT_EPOCH};
    ///
    /// let clock = MonotonicClock::with_epoch(DEFAULT_EPOCH);
    /// let first = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(2));
    /// assert!(clock.current_millis() >= first + 2);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        let start = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        let epoch_offset = u64::try_from(system_now.saturating_sub(epoch).as_millis())
            .unwrap_or(u64::MAX);

        Self {
            start,
            epoch_offset,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.epoch_offset.saturating_add(elapsed)
    }
}
