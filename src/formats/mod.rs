//! Low-level container backends.
//!
//! Each backend opens one family of files and hands back a tagged variant the
//! readers match on.

pub mod gifti;
mod image;
mod matlab;
mod nifti2;

pub use gifti::{DataArray, GiftiError, GiftiImage};
pub use image::Image;
pub use matlab::MatContainer;
