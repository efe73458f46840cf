use crate::{DEFAULT_EPOCH, Error, Result, TimeSource};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source that reads `SystemTime::now()` on every call.
///
/// Timestamps follow the system clock, including any backward adjustment made
/// by NTP or an operator. Generators detect such regressions and handle them
/// per [`ClockRegression`]. Use [`MonotonicClock`] to rule them out.
///
/// A system clock set earlier than the epoch reads as `0` from
/// [`TimeSource::current_millis`] and as [`Error::ClockBeforeEpoch`] from
/// [`TimeSource::try_current_millis`], which is what generators use.
///
/// [`TimeSource::current_millis`]: crate::TimeSource::current_millis
/// [`TimeSource::try_current_millis`]: crate::TimeSource::try_current_millis
/// [`Error::ClockBeforeEpoch`]: crate::Error::ClockBeforeEpoch
/// [`ClockRegression`]: crate::ClockRegression
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    /// Constructs a system clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a system clock using `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) as the origin.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The origin of this clock, as a [`Duration`] since 1970-01-01 UTC.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }

    fn since_unix() -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        let millis = Self::since_unix().saturating_sub(self.epoch).as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    fn try_current_millis(&self) -> Result<u64> {
        let since_epoch = Self::since_unix().checked_sub(self.epoch).ok_or_else(|| {
            Error::ClockBeforeEpoch {
                epoch_millis: u64::try_from(self.epoch.as_millis()).unwrap_or(u64::MAX),
            }
        })?;
        Ok(u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX))
    }
}
