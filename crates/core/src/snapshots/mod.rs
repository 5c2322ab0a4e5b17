//! Balance snapshot history: append-only, timestamped balance rows.

mod snapshot_model;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_traits::*;
