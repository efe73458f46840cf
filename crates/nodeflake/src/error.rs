/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `nodeflake` can emit.
///
/// Sequence exhaustion within a millisecond is never reported here: the
/// generator absorbs it by waiting for the next tick.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The node identifier is outside `0..=MAX_NODE_ID`.
    ///
    /// [`MAX_NODE_ID`]: crate::NodeflakeId::MAX_NODE_ID
    #[error("invalid node id {node_id}: expected a value in 0..={max}", max = crate::NodeflakeId::MAX_NODE_ID)]
    InvalidNodeId { node_id: i64 },

    /// The time source reported a timestamp earlier than the last one used.
    ///
    /// Only returned under [`ClockRegression::Reject`].
    ///
    /// [`ClockRegression::Reject`]: crate::ClockRegression::Reject
    #[error("clock moved backward: last timestamp {last}, now {now}")]
    ClockMovedBackward { last: u64, now: u64 },

    /// The time source advanced past the 41-bit timestamp field.
    #[error("timestamp {timestamp} does not fit in the 41-bit timestamp field")]
    TimestampOverflow { timestamp: u64 },

    /// A restored sequence is outside `0..=MAX_SEQUENCE`.
    ///
    /// [`MAX_SEQUENCE`]: crate::NodeflakeId::MAX_SEQUENCE
    #[error("invalid sequence {sequence}: expected a value in 0..={max}", max = crate::NodeflakeId::MAX_SEQUENCE)]
    InvalidSequence { sequence: u64 },

    /// The wall clock reads earlier than the configured epoch.
    #[error("clock is before the epoch ({epoch_millis} ms since 1970-01-01)")]
    ClockBeforeEpoch { epoch_millis: u64 },
}
