use core::{cmp::Ordering, fmt};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ClockRegression, Error, GeneratorConfig, NodeflakeId, Result, SystemClock, TimeSource,
    generator::Mutex,
};

/// A lock-based ID generator for one node, safe to share across threads.
///
/// The generator keeps its state (last timestamp, node ID, sequence) as a
/// packed [`NodeflakeId`] behind an [`Arc<Mutex<_>>`]. [`Self::produce`] holds
/// the lock for the whole call, so production on one generator is serialized
/// and every call observes a strictly larger `(timestamp, sequence)` pair than
/// the call before it.
///
/// Cloning a generator yields a handle to the **same** instance: clones share
/// the lock and the state. Generators for different node IDs share nothing.
///
/// ## Capacity
/// At most 4096 IDs per millisecond. The 4097th call within one millisecond
/// spins, still holding the lock, until the time source ticks over.
///
/// ## See Also
/// - [`GeneratorRegistry`] to hand out one generator per node ID
///
/// [`GeneratorRegistry`]: crate::GeneratorRegistry
#[derive(Clone)]
pub struct NodeflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<NodeflakeId>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<NodeflakeId>>,
    node_id: u64,
    time: T,
    on_clock_regression: ClockRegression,
}

impl NodeflakeGenerator<SystemClock> {
    /// Creates a generator for `node_id` backed by the wall clock at
    /// [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidNodeId`] if `node_id` is outside `0..=1023`.
    ///
    /// # Example
    /// ```
    /// use nodeflake::NodeflakeGenerator;
    ///
    /// let generator = NodeflakeGenerator::system(7).unwrap();
    /// let a = generator.produce().unwrap();
    /// let b = generator.produce().unwrap();
    /// assert!(a < b);
    /// assert_eq!(a.node_id(), 7);
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn system(node_id: i64) -> Result<Self> {
        Self::new(node_id, SystemClock::default())
    }
}

impl<T> NodeflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator for `node_id` with the timestamp and sequence
    /// set to zero.
    ///
    /// Backward clock movement is rejected (see [`ClockRegression::Reject`]).
    ///
    /// # Errors
    /// Returns [`Error::InvalidNodeId`] if `node_id` is negative or greater
    /// than [`NodeflakeId::MAX_NODE_ID`].
    pub fn new(node_id: i64, time: T) -> Result<Self> {
        Self::with_clock_regression(node_id, time, ClockRegression::default())
    }

    /// Creates a new generator with an explicit [`ClockRegression`] policy.
    ///
    /// # Errors
    /// Returns [`Error::InvalidNodeId`] if `node_id` is out of range.
    pub fn with_clock_regression(
        node_id: i64,
        time: T,
        on_clock_regression: ClockRegression,
    ) -> Result<Self> {
        let node_id = validate_node_id(node_id)?;
        Ok(Self::from_state(
            NodeflakeId::from_components(0, node_id, 0),
            time,
            on_clock_regression,
        ))
    }

    /// Creates a new generator taking its policy from `config`.
    ///
    /// The epoch in `config` is not applied here: it belongs to `time`. See
    /// [`GeneratorConfig::system_clock`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidNodeId`] if `node_id` is out of range.
    pub fn from_config(node_id: i64, time: T, config: &GeneratorConfig) -> Result<Self> {
        Self::with_clock_regression(node_id, time, config.on_clock_regression)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Useful for restoring the last issued timestamp and sequence after a
    /// restart, so that a clock that moved backward in between is detected.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`].
    ///
    /// # Errors
    /// - [`Error::InvalidNodeId`] if `node_id` is out of range
    /// - [`Error::TimestampOverflow`] if `timestamp` exceeds
    ///   [`NodeflakeId::MAX_TIMESTAMP`]
    /// - [`Error::InvalidSequence`] if `sequence` exceeds
    ///   [`NodeflakeId::MAX_SEQUENCE`]
    pub fn from_components(
        timestamp: u64,
        node_id: i64,
        sequence: u64,
        time: T,
        on_clock_regression: ClockRegression,
    ) -> Result<Self> {
        let node_id = validate_node_id(node_id)?;
        if timestamp > NodeflakeId::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { timestamp });
        }
        if sequence > NodeflakeId::MAX_SEQUENCE {
            return Err(Error::InvalidSequence { sequence });
        }
        Ok(Self::from_state(
            NodeflakeId::from_components(timestamp, node_id, sequence),
            time,
            on_clock_regression,
        ))
    }

    fn from_state(id: NodeflakeId, time: T, on_clock_regression: ClockRegression) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            node_id: id.node_id(),
            time,
            on_clock_regression,
        }
    }

    /// The node ID encoded into every ID this generator produces.
    pub const fn node_id(&self) -> u64 {
        self.node_id
    }

    /// The policy applied when the time source moves backward.
    pub const fn clock_regression(&self) -> ClockRegression {
        self.on_clock_regression
    }

    /// Returns true if both handles refer to the same generator instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Produces the next ID.
    ///
    /// The returned ID is unique for this generator and larger than every ID
    /// it returned before. If the current millisecond's 4096 sequence values
    /// are used up, the call spins until the time source advances.
    ///
    /// # Errors
    /// - [`Error::ClockMovedBackward`] if the time source went backward and
    ///   the policy is [`ClockRegression::Reject`]; the state is left as is,
    ///   so a later call succeeds once the clock catches up
    /// - [`Error::TimestampOverflow`] if the time source is past the 41-bit
    ///   timestamp range
    /// - any error from [`TimeSource::try_current_millis`], such as
    ///   [`Error::ClockBeforeEpoch`] for a wall clock set before the epoch;
    ///   this also ends a wait for the next millisecond
    ///
    /// # Example
    /// ```
    /// use nodeflake::{NodeflakeGenerator, TimeSource};
    ///
    /// struct FixedTime;
    /// impl TimeSource for FixedTime {
    ///     fn current_millis(&self) -> u64 {
    ///         5
    ///     }
    /// }
    ///
    /// let generator = NodeflakeGenerator::new(3, FixedTime).unwrap();
    /// assert_eq!(generator.produce().unwrap().to_raw(), 20_983_808);
    /// assert_eq!(generator.produce().unwrap().to_raw(), 20_983_809);
    /// ```
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(node_id = self.node_id))
    )]
    pub fn produce(&self) -> Result<NodeflakeId> {
        let mut state = self.state.lock();
        let next = self.next_state(*state)?;
        *state = next;
        Ok(next)
    }

    fn next_state(&self, state: NodeflakeId) -> Result<NodeflakeId> {
        let now = self.time.try_current_millis()?;
        let last = state.timestamp();

        match now.cmp(&last) {
            Ordering::Greater => Self::rollover(state, now),
            Ordering::Equal if state.has_sequence_room() => Ok(state.increment_sequence()),
            Ordering::Equal => self.cold_sequence_exhausted(state),
            Ordering::Less => self.cold_clock_behind(state, now),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(&self, state: NodeflakeId) -> Result<NodeflakeId> {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            node_id = self.node_id,
            timestamp = state.timestamp(),
            "sequence exhausted, waiting for the next millisecond"
        );
        let now = self.spin_past(state.timestamp())?;
        Self::rollover(state, now)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, state: NodeflakeId, now: u64) -> Result<NodeflakeId> {
        let last = state.timestamp();
        #[cfg(feature = "tracing")]
        tracing::warn!(
            node_id = self.node_id,
            last,
            now,
            policy = ?self.on_clock_regression,
            "clock moved backward"
        );

        match self.on_clock_regression {
            ClockRegression::Reject => Err(Error::ClockMovedBackward { last, now }),
            ClockRegression::Wait => Self::rollover(state, self.spin_past(last)?),
            ClockRegression::Adopt => Self::rollover(state, now),
        }
    }

    /// Polls the time source until it reports a millisecond after `last`,
    /// or until reading it fails.
    fn spin_past(&self, last: u64) -> Result<u64> {
        loop {
            let now = self.time.try_current_millis()?;
            if now > last {
                break Ok(now);
            }
            core::hint::spin_loop();
        }
    }

    fn rollover(state: NodeflakeId, now: u64) -> Result<NodeflakeId> {
        if now > NodeflakeId::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { timestamp: now });
        }
        Ok(state.rollover_to_timestamp(now))
    }
}

impl<T> fmt::Debug for NodeflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeflakeGenerator")
            .field("node_id", &self.node_id)
            .field("on_clock_regression", &self.on_clock_regression)
            .finish_non_exhaustive()
    }
}

/// Checks that `node_id` fits the 10-bit node field.
pub(crate) fn validate_node_id(node_id: i64) -> Result<u64> {
    u64::try_from(node_id)
        .ok()
        .filter(|id| *id <= NodeflakeId::MAX_NODE_ID)
        .ok_or(Error::InvalidNodeId { node_id })
}
