//! HDF5 `.h5` reader.

use crate::data::ArrayMap;
use crate::error::{ensure_exists, NiioError, Result};
use crate::options::DatasetSelector;
use std::path::Path;

/// Load datasets from an HDF5 file.
///
/// With `group`, datasets are looked up inside that group. Without
/// `datasets`, every dataset directly under the group (or file root) is read;
/// sub-groups are not descended into and are left out of the result with a
/// warning. Naming a sub-group explicitly is an
/// [`NiioError::UnsupportedContainer`]. The file and group handles are closed
/// before returning.
pub fn load_h5(
    path: &Path,
    datasets: Option<&DatasetSelector>,
    group: Option<&str>,
) -> Result<ArrayMap> {
    ensure_exists(path)?;
    let requested = requested_names(datasets)?;

    let file = hdf5::File::open(path).map_err(|e| NiioError::read_failure(path, e))?;
    let lower;
    let scope: &hdf5::Group = match group {
        Some(name) => {
            lower = file
                .group(name)
                .map_err(|_| NiioError::missing_group(path, name))?;
            &lower
        }
        None => &file,
    };

    let names = match requested {
        Some(names) => names,
        None => scope
            .member_names()
            .map_err(|e| NiioError::read_failure(path, e))?
            .into_iter()
            .filter(|name| {
                let is_dataset = scope.dataset(name).is_ok();
                if !is_dataset {
                    tracing::warn!(
                        "Skipping non-dataset member {} of {}",
                        name,
                        path.display()
                    );
                }
                is_dataset
            })
            .collect(),
    };

    let mut data = ArrayMap::new();
    for name in names {
        if !scope.link_exists(&name) {
            return Err(NiioError::missing_key(path, name));
        }
        let dataset = scope.dataset(&name).map_err(|_| {
            NiioError::unsupported_container(path, format!("non-dataset member {}", name))
        })?;
        let array = dataset
            .read_dyn::<f64>()
            .map_err(|e| NiioError::read_failure(path, format!("{}: {}", name, e)))?;
        tracing::debug!("Read {} {:?} from {}", name, array.shape(), path.display());
        data.insert(name, array);
    }

    Ok(data)
}

fn requested_names(datasets: Option<&DatasetSelector>) -> Result<Option<Vec<String>>> {
    match datasets {
        None => Ok(None),
        Some(DatasetSelector::Name(name)) => Ok(Some(vec![name.clone()])),
        Some(DatasetSelector::Names(names)) if names.is_empty() => Ok(None),
        Some(DatasetSelector::Names(names)) => Ok(Some(names.clone())),
        Some(other) => Err(NiioError::invalid_selector("HDF5", other)),
    }
}
