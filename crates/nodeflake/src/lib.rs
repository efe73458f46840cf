//! Time-ordered, collision-resistant 64-bit IDs for multi-node systems.
//!
//! Each node is assigned an ID in `0..=1023` out of band. A
//! [`NodeflakeGenerator`] for that node packs the milliseconds since an epoch,
//! the node ID, and a per-millisecond sequence into one `u64`:
//!
//! ```text
//! [1 bit reserved][41 bits timestamp][10 bits node ID][12 bits sequence]
//! ```
//!
//! Generators are thread-safe; one generator never returns the same ID twice
//! and its output only increases. A [`GeneratorRegistry`] lazily creates one
//! generator per node ID and returns the same instance on later requests.
//!
//! ```
//! use nodeflake::GeneratorRegistry;
//!
//! let registry = GeneratorRegistry::new();
//! let generator = registry.get_or_create(3)?;
//! let id = generator.produce()?;
//! assert_eq!(id.node_id(), 3);
//! # Ok::<(), nodeflake::Error>(())
//! ```
//!
//! ## Features
//! - `tracing` (default): emit `tracing` events and spans
//! - `serde`: (de)serialize IDs and [`GeneratorConfig`]
//! - `cache-padded`: pad each generator's lock to a cache line
mod config;
mod error;
mod generator;
mod id;
mod registry;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::registry::*;
pub use crate::time::*;
