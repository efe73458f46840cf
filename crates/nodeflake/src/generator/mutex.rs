// `parking_lot` locks do not poison, so neither generators nor the registry
// have a lock error path.
pub(crate) use parking_lot::{Mutex, RwLock};
