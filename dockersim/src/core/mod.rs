//! Pure state logic: log buffers, counters, and their wire types.
//!
//! Nothing here sleeps or touches shared handles; the [`crate::harness`]
//! owns the single live instance and the [`crate::step`] runner drives it.

pub mod log_store;
pub mod state;
pub mod types;
