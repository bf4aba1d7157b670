//! Pickle `.p` reader.

use crate::error::{ensure_exists, NiioError, Result};
use serde::de::DeserializeOwned;
use serde_pickle::{DeOptions, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>> {
    ensure_exists(path)?;
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| NiioError::read_failure(path, e))
}

/// Load a pickled object as a generic value, unchanged and unvalidated.
///
/// Only builtin Python types can be represented. A pickle that references any
/// other class (numpy arrays, pandas frames, custom objects) fails with
/// [`NiioError::ReadFailure`]; see [`load_pick_lossy`].
pub fn load_pick(path: &Path) -> Result<Value> {
    let reader = open(path)?;
    serde_pickle::value_from_reader(reader, DeOptions::new())
        .map_err(|e| NiioError::read_failure(path, e))
}

/// Like [`load_pick`], but references to classes that cannot be represented
/// are replaced by `None` instead of failing.
///
/// The rest of the object graph is kept, so containers holding a mix of
/// builtin values and foreign objects stay usable.
pub fn load_pick_lossy(path: &Path) -> Result<Value> {
    let reader = open(path)?;
    let options = DeOptions::new().replace_unresolved_globals();
    serde_pickle::value_from_reader(reader, options).map_err(|e| NiioError::read_failure(path, e))
}

/// Load a pickled object straight into a typed value.
pub fn load_pick_as<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open(path)?;
    serde_pickle::from_reader(reader, DeOptions::new()).map_err(|e| NiioError::read_failure(path, e))
}
