use core::fmt;
use std::collections::HashMap;

use crate::{
    ClockRegression, GeneratorConfig, NodeflakeGenerator, Result, SystemClock, TimeSource,
    generator::{RwLock, validate_node_id},
};

/// Hands out one [`NodeflakeGenerator`] per node ID.
///
/// The first request for a node ID creates its generator; every later request
/// returns a handle to that same instance. Entries are never removed or
/// replaced for the lifetime of the registry.
///
/// The registry is an ordinary value: construct it once and keep it (e.g.
/// behind an `Arc`) wherever the process needs IDs.
///
/// # Example
/// ```
/// use nodeflake::GeneratorRegistry;
///
/// let registry = GeneratorRegistry::new();
/// let a = registry.get_or_create(5).unwrap();
/// let b = registry.get_or_create(5).unwrap();
/// assert!(a.same_instance(&b));
///
/// let first = a.produce().unwrap();
/// let second = b.produce().unwrap();
/// assert!(first < second);
/// ```
pub struct GeneratorRegistry<T = SystemClock>
where
    T: TimeSource + Clone,
{
    generators: RwLock<HashMap<u64, NodeflakeGenerator<T>>>,
    time: T,
    on_clock_regression: ClockRegression,
}

impl Default for GeneratorRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry<SystemClock> {
    /// Creates an empty registry whose generators use the wall clock at
    /// [`DEFAULT_EPOCH`] and reject backward clock movement.
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new() -> Self {
        Self::with_time(SystemClock::default(), ClockRegression::default())
    }

    /// Creates an empty registry from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::with_time(config.system_clock(), config.on_clock_regression)
    }
}

impl<T> GeneratorRegistry<T>
where
    T: TimeSource + Clone,
{
    /// Creates an empty registry; each generator receives a clone of `time`.
    pub fn with_time(time: T, on_clock_regression: ClockRegression) -> Self {
        Self {
            generators: RwLock::new(HashMap::new()),
            time,
            on_clock_regression,
        }
    }

    /// Returns the generator for `node_id`, creating it on first use.
    ///
    /// Concurrent first requests for the same node ID still create exactly
    /// one generator.
    ///
    /// # Errors
    /// Returns [`Error::InvalidNodeId`] if `node_id` is outside `0..=1023`;
    /// nothing is stored in that case.
    ///
    /// [`Error::InvalidNodeId`]: crate::Error::InvalidNodeId
    pub fn get_or_create(&self, node_id: i64) -> Result<NodeflakeGenerator<T>> {
        let key = validate_node_id(node_id)?;

        if let Some(generator) = self.generators.read().get(&key) {
            return Ok(generator.clone());
        }

        let mut generators = self.generators.write();
        if let Some(generator) = generators.get(&key) {
            return Ok(generator.clone());
        }

        let generator = NodeflakeGenerator::with_clock_regression(
            node_id,
            self.time.clone(),
            self.on_clock_regression,
        )?;
        #[cfg(feature = "tracing")]
        tracing::debug!(node_id, policy = ?self.on_clock_regression, "created generator");
        generators.insert(key, generator.clone());
        Ok(generator)
    }

    /// Returns the generator for `node_id` if one was already created.
    pub fn get(&self, node_id: i64) -> Option<NodeflakeGenerator<T>> {
        let key = u64::try_from(node_id).ok()?;
        self.generators.read().get(&key).cloned()
    }

    /// Node IDs with a generator, in ascending order.
    pub fn node_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.generators.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of generators created so far.
    pub fn len(&self) -> usize {
        self.generators.read().len()
    }

    /// Returns true if no generator was created yet.
    pub fn is_empty(&self) -> bool {
        self.generators.read().is_empty()
    }
}

impl<T> fmt::Debug for GeneratorRegistry<T>
where
    T: TimeSource + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("node_ids", &self.node_ids())
            .field("on_clock_regression", &self.on_clock_regression)
            .finish_non_exhaustive()
    }
}
