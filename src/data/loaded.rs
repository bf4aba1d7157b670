//! Loaded payloads.

use ndarray::ArrayD;
use std::collections::BTreeMap;

/// Named arrays read from an HDF5 file or group.
pub type ArrayMap = BTreeMap<String, ArrayD<f64>>;

/// Whatever a reader hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// A single numeric array (MATLAB, GIFTI, NIfTI).
    Array(ArrayD<f64>),
    /// Dataset name to array (HDF5).
    Mapping(ArrayMap),
    /// A deserialized pickle, unchanged.
    Object(serde_pickle::Value),
    /// Nothing was found. Only produced by the legacy quiet-missing-key
    /// MATLAB mode.
    Empty,
}

impl Loaded {
    /// Short name of the payload kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Loaded::Array(_) => "array",
            Loaded::Mapping(_) => "mapping",
            Loaded::Object(_) => "object",
            Loaded::Empty => "empty",
        }
    }

    /// Take the array, if this is one.
    pub fn into_array(self) -> Option<ArrayD<f64>> {
        match self {
            Loaded::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Take the mapping, if this is one.
    pub fn into_mapping(self) -> Option<ArrayMap> {
        match self {
            Loaded::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Take the pickled object, if this is one.
    pub fn into_object(self) -> Option<serde_pickle::Value> {
        match self {
            Loaded::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Check if nothing was loaded.
    pub fn is_empty(&self) -> bool {
        matches!(self, Loaded::Empty)
    }
}

impl From<ArrayD<f64>> for Loaded {
    fn from(array: ArrayD<f64>) -> Self {
        Loaded::Array(array)
    }
}

impl From<ArrayMap> for Loaded {
    fn from(map: ArrayMap) -> Self {
        Loaded::Mapping(map)
    }
}

impl From<Option<ArrayD<f64>>> for Loaded {
    fn from(array: Option<ArrayD<f64>>) -> Self {
        array.map_or(Loaded::Empty, Loaded::Array)
    }
}
