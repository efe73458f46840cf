use crate::{DEFAULT_EPOCH, SystemClock};
use core::time::Duration;

/// What a generator does when its time source reports a timestamp earlier
/// than the last one it used.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClockRegression {
    /// Fail the call with [`Error::ClockMovedBackward`] and leave the state
    /// untouched.
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    #[default]
    Reject,

    /// Spin while holding the lock until the clock passes the last timestamp
    /// used, then continue from the new millisecond.
    Wait,

    /// Adopt the earlier timestamp and reset the sequence.
    ///
    /// # ⚠️ Note
    /// IDs produced after the regression can be smaller than, or equal to,
    /// IDs issued before it. Only use this if downstream consumers tolerate
    /// duplicates.
    Adopt,
}

/// Settings shared by every generator a registry creates.
///
/// # Example
/// ```
/// use nodeflake::{ClockRegression, GeneratorConfig, GeneratorRegistry};
///
/// let config = GeneratorConfig {
///     on_clock_regression: ClockRegression::Wait,
///     ..GeneratorConfig::default()
/// };
/// let registry = GeneratorRegistry::from_config(&config);
/// let id = registry.get_or_create(3).unwrap().produce().unwrap();
/// assert_eq!(id.node_id(), 3);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Epoch in milliseconds since 1970-01-01 UTC.
    pub epoch_millis: u64,
    pub on_clock_regression: ClockRegression,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            epoch_millis: DEFAULT_EPOCH.as_millis() as u64,
            on_clock_regression: ClockRegression::default(),
        }
    }
}

impl GeneratorConfig {
    /// [`Self::epoch_millis`] as a [`Duration`] since 1970-01-01 UTC.
    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_millis)
    }

    /// Builds a [`SystemClock`] anchored at the configured epoch.
    pub const fn system_clock(&self) -> SystemClock {
        SystemClock::with_epoch(self.epoch())
    }
}
