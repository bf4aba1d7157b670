//! Data representation.
//!
//! Payload types handed back by the readers and the shape helpers they share.

mod loaded;
pub mod shape;
mod summary;
mod surface;

pub use loaded::{ArrayMap, Loaded};
pub use summary::{format_number, format_stat_value, ArraySummary};
pub use surface::{Surface, SurfaceSource};
