//! Format readers.
//!
//! One reader per file family. Each checks that the path exists, opens its
//! container, and returns a fully materialized payload or an error.

mod gii;
mod h5;
mod mat;
mod pick;
mod surf;

pub use gii::{load_gii, GiiSelection};
pub use h5::load_h5;
pub use mat::{is_private_key, load_mat, load_mat_lenient};
pub use pick::{load_pick, load_pick_as, load_pick_lossy};
pub use surf::load_surf;
