mod lock;
mod mutex;

pub use lock::*;
pub(crate) use lock::validate_node_id;
pub(crate) use mutex::*;
