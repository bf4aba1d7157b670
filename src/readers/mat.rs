//! MATLAB `.mat` reader.

use crate::data::shape::{squeeze, transpose};
use crate::error::{ensure_exists, NiioError, Result};
use crate::formats::MatContainer;
use ndarray::ArrayD;
use std::path::Path;

/// Variable names starting with one of these are bookkeeping, not data.
const PRIVATE_PREFIXES: [char; 2] = ['_', '#'];

/// Check if a variable name is private (`__header__`, `#refs#`, ...).
pub fn is_private_key(key: &str) -> bool {
    key.starts_with(&PRIVATE_PREFIXES[..])
}

/// Load one variable from a MATLAB file.
///
/// Without a name, the first non-private variable in container order is
/// returned. Singleton axes are squeezed, and arrays from HDF5-backed (v7.3)
/// files are transposed so both MATLAB versions yield the same orientation.
pub fn load_mat(path: &Path, dataset: Option<&str>) -> Result<ArrayD<f64>> {
    ensure_exists(path)?;
    let container = MatContainer::open(path)?;

    let key = match dataset {
        Some(name) => name.to_string(),
        None => first_public_key(path, &container)?,
    };
    tracing::debug!("Reading MATLAB variable {} from {}", key, path.display());

    let array = container
        .read(&key)?
        .ok_or_else(|| NiioError::missing_key(path, &key))?;

    let array = squeeze(array);
    Ok(if container.is_hdf5() {
        transpose(array)
    } else {
        array
    })
}

/// Legacy variant of [`load_mat`]: a missing *named* variable yields `None`.
///
/// This keeps the historical quiet no-result behaviour for callers that rely
/// on it. Every other failure is still an error.
pub fn load_mat_lenient(path: &Path, dataset: Option<&str>) -> Result<Option<ArrayD<f64>>> {
    match load_mat(path, dataset) {
        Err(NiioError::MissingKey { key, .. }) if dataset == Some(key.as_str()) => {
            tracing::warn!(
                "MATLAB variable {} not found in {}; returning nothing",
                key,
                path.display()
            );
            Ok(None)
        }
        other => other.map(Some),
    }
}

fn first_public_key(path: &Path, container: &MatContainer) -> Result<String> {
    container
        .keys()?
        .into_iter()
        .find(|key| !is_private_key(key))
        .ok_or_else(|| NiioError::missing_key(path, "<first non-private variable>"))
}
