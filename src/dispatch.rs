//! Extension-based routing to the format readers.

use crate::data::Loaded;
use crate::error::{ensure_exists, NiioError, Result};
use crate::options::LoadOptions;
use crate::readers;
use std::fmt;
use std::path::Path;

/// File formats [`load`] knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `.mat`: MATLAB v5 or v7.3.
    Mat,
    /// `.gii`: GIFTI.
    Gii,
    /// `.h5`: HDF5.
    H5,
    /// `.p`: pickle.
    Pickle,
}

impl Format {
    /// Every routed format.
    pub const ALL: [Format; 4] = [Format::Mat, Format::Gii, Format::H5, Format::Pickle];

    /// The suffix, without the dot, that selects this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Mat => "mat",
            Format::Gii => "gii",
            Format::H5 => "h5",
            Format::Pickle => "p",
        }
    }

    /// Match an extension (without the dot). Matching is case-sensitive.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension {
            "mat" => Ok(Format::Mat),
            "gii" => Ok(Format::Gii),
            "h5" => Ok(Format::H5),
            "p" => Ok(Format::Pickle),
            other => Err(NiioError::unsupported_extension(other)),
        }
    }

    /// Derive the format from the last suffix of a path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(extension)
    }

    /// Call the reader for this format.
    pub fn read_with<R: FormatReaders + ?Sized>(
        self,
        readers: &R,
        path: &Path,
        options: &LoadOptions,
    ) -> Result<Loaded> {
        match self {
            Format::Mat => readers.mat(path, options),
            Format::Gii => readers.gii(path, options),
            Format::H5 => readers.h5(path, options),
            Format::Pickle => readers.pick(path, options),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// One reader per routed format.
///
/// [`NativeReaders`] is the real implementation; tests substitute their own
/// to observe routing.
pub trait FormatReaders {
    /// Read a `.mat` file.
    fn mat(&self, path: &Path, options: &LoadOptions) -> Result<Loaded>;
    /// Read a `.gii` file.
    fn gii(&self, path: &Path, options: &LoadOptions) -> Result<Loaded>;
    /// Read a `.h5` file.
    fn h5(&self, path: &Path, options: &LoadOptions) -> Result<Loaded>;
    /// Read a `.p` file.
    fn pick(&self, path: &Path, options: &LoadOptions) -> Result<Loaded>;
}

/// Readers backed by the format libraries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeReaders;

impl FormatReaders for NativeReaders {
    fn mat(&self, path: &Path, options: &LoadOptions) -> Result<Loaded> {
        let name = match &options.datasets {
            None => None,
            Some(crate::DatasetSelector::Name(name)) => Some(name.as_str()),
            Some(other) => return Err(NiioError::invalid_selector("MATLAB", other)),
        };
        if options.legacy_missing_key {
            readers::load_mat_lenient(path, name).map(Loaded::from)
        } else {
            readers::load_mat(path, name).map(Loaded::from)
        }
    }

    fn gii(&self, path: &Path, options: &LoadOptions) -> Result<Loaded> {
        readers::load_gii(path, options.datasets.as_ref(), options.group.as_deref())
            .map(Loaded::from)
    }

    fn h5(&self, path: &Path, options: &LoadOptions) -> Result<Loaded> {
        readers::load_h5(path, options.datasets.as_ref(), options.group.as_deref())
            .map(Loaded::from)
    }

    fn pick(&self, path: &Path, _options: &LoadOptions) -> Result<Loaded> {
        readers::load_pick(path).map(Loaded::Object)
    }
}

/// Routes paths to a set of readers by extension.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<R = NativeReaders> {
    readers: R,
}

impl<R: FormatReaders> Dispatcher<R> {
    /// Create a dispatcher over the given readers.
    pub fn new(readers: R) -> Self {
        Self { readers }
    }

    /// Borrow the readers.
    pub fn readers(&self) -> &R {
        &self.readers
    }

    /// Check the path exists, pick the reader by extension, and forward the
    /// options unchanged.
    pub fn load(&self, path: &Path, options: &LoadOptions) -> Result<Loaded> {
        ensure_exists(path)?;
        let format = Format::from_path(path)?;
        tracing::debug!("Loading {} as {}", path.display(), format);
        format.read_with(&self.readers, path, options)
    }
}

/// Load a neuroimaging data file, choosing the reader by extension.
///
/// `.mat` and `.gii` give [`Loaded::Array`], `.h5` gives [`Loaded::Mapping`]
/// and `.p` gives [`Loaded::Object`].
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Loaded> {
    Dispatcher::new(NativeReaders).load(path.as_ref(), options)
}
