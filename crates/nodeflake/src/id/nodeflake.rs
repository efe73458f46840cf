use core::fmt;

/// A 64-bit time-ordered ID.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch, see
///   [`DEFAULT_EPOCH`])
/// - 10 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) |   node ID (10)  | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// Ordering follows the raw integer, so IDs sort by timestamp first, then node
/// ID, then sequence.
///
/// # Example
///
/// ```
/// use nodeflake::NodeflakeId;
///
/// // 5 ms after the epoch, node 3, first ID of that millisecond.
/// let id = NodeflakeId::from_components(5, 3, 0);
/// assert_eq!(id.to_raw(), 20_983_808);
/// assert_eq!(id.timestamp(), 5);
/// assert_eq!(id.node_id(), 3);
/// assert_eq!(id.sequence(), 0);
/// ```
///
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeflakeId {
    id: u64,
}

impl NodeflakeId {
    /// Width of the node ID field.
    pub const NODE_ID_BITS: u32 = 10;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Number of bits to shift the node ID to its correct position (bit 12).
    pub const NODE_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::NODE_ID_BITS + Self::SEQUENCE_BITS;

    /// Bitmask for the 41-bit timestamp field, before shifting.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 10-bit node ID field, before shifting.
    pub const NODE_ID_MASK: u64 = (1 << Self::NODE_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Largest timestamp that fits the layout.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest accepted node ID (1023).
    pub const MAX_NODE_ID: u64 = Self::NODE_ID_MASK;

    /// Largest sequence value within one millisecond (4095).
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the three fields into an ID. Each field is masked to its width.
    pub const fn from_components(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        let sequence = sequence & Self::SEQUENCE_MASK;
        Self {
            id: timestamp | node_id | sequence,
        }
    }

    /// Extracts the timestamp (ms since the epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the node ID from the packed ID.
    pub const fn node_id(&self) -> u64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    /// The packed 64-bit value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a packed value, e.g. one read back from storage. No bits are
    /// checked or masked.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns true if another ID fits in the current millisecond.
    pub(crate) const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::MAX_SEQUENCE
    }

    /// Returns a new ID with the sequence incremented.
    pub(crate) const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.node_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a different timestamp with the sequence reset.
    pub(crate) const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.node_id(), 0)
    }
}

impl From<NodeflakeId> for u64 {
    fn from(id: NodeflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for NodeflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for NodeflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeflakeId")
            .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants() {
        assert_eq!(NodeflakeId::MAX_NODE_ID, 1023);
        assert_eq!(NodeflakeId::MAX_SEQUENCE, 4095);
        assert_eq!(NodeflakeId::NODE_ID_SHIFT, 12);
        assert_eq!(NodeflakeId::TIMESTAMP_SHIFT, 22);
        assert_eq!(
            NodeflakeId::TIMESTAMP_BITS + NodeflakeId::NODE_ID_BITS + NodeflakeId::SEQUENCE_BITS,
            63
        );
    }

    #[test]
    fn packs_reference_example() {
        // now = 1563700212005, epoch = 1563700212000
        let id = NodeflakeId::from_components(5, 3, 0);
        assert_eq!(id.to_raw(), (5 << 22) | (3 << 12));
        assert_eq!(id.to_raw(), 20_983_808);
    }

    #[test]
    fn max_fields_leave_reserved_bit_clear() {
        let id = NodeflakeId::from_components(
            NodeflakeId::MAX_TIMESTAMP,
            NodeflakeId::MAX_NODE_ID,
            NodeflakeId::MAX_SEQUENCE,
        );
        assert_eq!(id.to_raw(), u64::MAX >> 1);
        assert_eq!(id.timestamp(), NodeflakeId::MAX_TIMESTAMP);
        assert_eq!(id.node_id(), NodeflakeId::MAX_NODE_ID);
        assert_eq!(id.sequence(), NodeflakeId::MAX_SEQUENCE);
    }

    #[test]
    fn fields_are_masked() {
        let id = NodeflakeId::from_components(1, NodeflakeId::MAX_NODE_ID + 2, 0);
        assert_eq!(id.node_id(), 1);
        assert_eq!(id.timestamp(), 1);
    }

    #[test]
    fn increment_and_rollover() {
        let id = NodeflakeId::from_components(42, 7, 4094);
        assert!(id.has_sequence_room());

        let id = id.increment_sequence();
        assert_eq!(id.sequence(), 4095);
        assert!(!id.has_sequence_room());

        let id = id.rollover_to_timestamp(43);
        assert_eq!(id.timestamp(), 43);
        assert_eq!(id.node_id(), 7);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn ordering_is_time_first() {
        let earlier = NodeflakeId::from_components(10, 1023, 4095);
        let later = NodeflakeId::from_components(11, 0, 0);
        assert!(earlier < later);
    }

    #[test]
    fn debug_lists_fields() {
        let id = NodeflakeId::from_components(5, 3, 1);
        let debug = format!("{id:?}");
        assert!(debug.contains("timestamp: 5"));
        assert!(debug.contains("node_id: 3"));
        assert!(debug.contains("sequence: 1"));
        assert_eq!(id.to_string(), "20983809");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_raw_integer() {
        let id = NodeflakeId::from_components(5, 3, 0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "20983808");
        let back: NodeflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
