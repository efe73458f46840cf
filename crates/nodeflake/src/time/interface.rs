use crate::Result;
use core::time::Duration;

/// Default epoch: Sunday, July 21, 2019 09:10:12 UTC.
///
/// Every ID stores its timestamp relative to this instant. Once IDs have been
/// issued it must never change, or new IDs may collide with old ones.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_563_700_212_000);

/// A trait for time sources that return a wall-clock or monotonic timestamp.
///
/// This abstraction allows you to plug in the system clock, a monotonic timer,
/// or a mocked time source in tests. The unit is **milliseconds** relative to
/// the source's epoch.
///
/// # Example
///
/// ```
/// use nodeflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;

    /// Fallible counterpart of [`Self::current_millis`], used by generators.
    ///
    /// Sources that can read earlier than their epoch report it here instead
    /// of returning a timestamp that never advances.
    ///
    /// # Errors
    /// The default implementation never fails.
    fn try_current_millis(&self) -> Result<u64> {
        Ok(self.current_millis())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn try_current_millis(&self) -> Result<u64> {
        (**self).try_current_millis()
    }
}
