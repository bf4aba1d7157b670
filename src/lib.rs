//! niio - uniform loading of neuroimaging data files.
//!
//! niio reads the containers brain-surface analysis pipelines pass around and
//! hands back plain `ndarray` arrays with normalized axis order and shape.
//!
//! # Formats
//!
//! - `.mat`: MATLAB v7.3 (HDF5-backed, transposed to MATLAB order) or v5
//! - `.gii`: GIFTI data arrays, column-stacked (NIfTI volumes via [`load_gii`])
//! - `.h5`: HDF5 datasets, optionally inside a group
//! - `.p`: pickled objects
//! - Surfaces: GIFTI or FreeSurfer geometry via [`load_surf`]
//!
//! # Example
//!
//! ```ignore
//! use niio::{load, LoadOptions, Loaded};
//!
//! // First non-private variable of a MATLAB file
//! let loaded = load("features.mat", &LoadOptions::new())?;
//!
//! // Two datasets from a group of an HDF5 file
//! let options = LoadOptions::new()
//!     .with_datasets(vec!["x".to_string(), "y".to_string()])
//!     .with_group("subject01");
//! if let Loaded::Mapping(map) = load("scores.h5", &options)? {
//!     println!("{:?}", map["x"].shape());
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod data;
pub mod dispatch;
pub mod error;
pub mod formats;
pub mod options;
pub mod readers;

pub use data::{ArrayMap, ArraySummary, Loaded, Surface, SurfaceSource};
pub use dispatch::{load, Dispatcher, Format, FormatReaders, NativeReaders};
pub use error::{NiioError, Result};
pub use options::{DatasetSelector, LoadOptions};
pub use readers::{
    load_gii, load_h5, load_mat, load_mat_lenient, load_pick, load_pick_as, load_pick_lossy,
    load_surf,
};
