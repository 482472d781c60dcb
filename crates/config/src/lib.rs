//! Per-lane oracle configuration.
//!
//! [`ConfigStore`] holds, for every lane, the signer and transmitter rosters,
//! the fault tolerance `f` and the signature verification flag. Rotations
//! apply a batch of lane entries atomically; readers work from immutable
//! [`StoreSnapshot`]s.

mod error;
mod rotation;
mod snapshot;
mod store;

pub use error::{ConfigError, InvalidConfigKind};
pub use snapshot::{LaneState, StoreSnapshot};
pub use store::ConfigStore;
