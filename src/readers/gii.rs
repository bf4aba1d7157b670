//! GIFTI/NIfTI surface-data reader.

use crate::data::shape::{column_stack, squeeze};
use crate::error::{ensure_exists, NiioError, Result};
use crate::formats::Image;
use crate::options::DatasetSelector;
use ndarray::ArrayD;
use std::path::Path;

/// Normalized GIFTI data-array selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiiSelection {
    /// Every data array, in file order.
    All,
    /// These data arrays, in this order.
    Indices(Vec<usize>),
}

impl GiiSelection {
    /// Normalize a selector: one index becomes a one-element list, and a
    /// missing or empty list selects everything.
    pub fn from_selector(selector: Option<&DatasetSelector>) -> Result<Self> {
        match selector {
            None => Ok(GiiSelection::All),
            Some(DatasetSelector::Index(i)) => Ok(GiiSelection::Indices(vec![*i])),
            Some(DatasetSelector::Indices(v)) if v.is_empty() => Ok(GiiSelection::All),
            Some(DatasetSelector::Indices(v)) => Ok(GiiSelection::Indices(v.clone())),
            Some(other) => Err(NiioError::invalid_selector("GIFTI", other)),
        }
    }

    /// Concrete indices for an image with `count` data arrays.
    pub fn resolve(&self, count: usize) -> Vec<usize> {
        match self {
            GiiSelection::All => (0..count).collect(),
            GiiSelection::Indices(v) => v.clone(),
        }
    }
}

/// Load data arrays from a GIFTI file, or the volume of a NIfTI file.
///
/// Selected GIFTI arrays are squeezed and column-stacked in selector order,
/// then the result is squeezed again. `group` is accepted for signature
/// compatibility with the other readers and ignored.
pub fn load_gii(
    path: &Path,
    datasets: Option<&DatasetSelector>,
    _group: Option<&str>,
) -> Result<ArrayD<f64>> {
    ensure_exists(path)?;
    let selection = GiiSelection::from_selector(datasets)?;

    match Image::open(path)? {
        Image::Gifti(gii) => {
            let indices = selection.resolve(gii.darrays.len());
            tracing::debug!(
                "Stacking GIFTI arrays {:?} of {} from {}",
                indices,
                gii.darrays.len(),
                path.display()
            );
            if indices.is_empty() {
                return Err(NiioError::missing_key(path, "data array 0"));
            }

            let arrays = indices
                .iter()
                .map(|&i| {
                    let darray = gii
                        .darrays
                        .get(i)
                        .ok_or_else(|| NiioError::missing_key(path, format!("data array {}", i)))?;
                    darray
                        .to_f64()
                        .map(squeeze)
                        .map_err(|e| NiioError::read_failure(path, e))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(squeeze(column_stack(&arrays)?))
        }
        Image::Nifti(volume) => Ok(squeeze(volume)),
    }
}
