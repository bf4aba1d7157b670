//! Options forwarded from the dispatcher to the readers.

/// Which dataset(s) to pull out of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSelector {
    /// One named dataset (MATLAB variable or HDF5 dataset).
    Name(String),
    /// Several named datasets (HDF5).
    Names(Vec<String>),
    /// One data-array index (GIFTI).
    Index(usize),
    /// Several data-array indices, in output column order (GIFTI).
    Indices(Vec<usize>),
}

impl From<&str> for DatasetSelector {
    fn from(name: &str) -> Self {
        DatasetSelector::Name(name.to_string())
    }
}

impl From<String> for DatasetSelector {
    fn from(name: String) -> Self {
        DatasetSelector::Name(name)
    }
}

impl From<Vec<String>> for DatasetSelector {
    fn from(names: Vec<String>) -> Self {
        DatasetSelector::Names(names)
    }
}

impl From<usize> for DatasetSelector {
    fn from(index: usize) -> Self {
        DatasetSelector::Index(index)
    }
}

impl From<Vec<usize>> for DatasetSelector {
    fn from(indices: Vec<usize>) -> Self {
        DatasetSelector::Indices(indices)
    }
}

/// Format-specific options for [`crate::load`].
///
/// Each reader looks only at the fields it understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Dataset selection; `None` applies the reader's default policy.
    pub datasets: Option<DatasetSelector>,
    /// HDF5 group holding the datasets.
    pub group: Option<String>,
    /// MATLAB only: a missing named variable yields [`crate::Loaded::Empty`]
    /// instead of an error.
    pub legacy_missing_key: bool,
}

impl LoadOptions {
    /// Create options with every default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select datasets.
    pub fn with_datasets(mut self, datasets: impl Into<DatasetSelector>) -> Self {
        self.datasets = Some(datasets.into());
        self
    }

    /// Read from an HDF5 group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Enable the legacy quiet-missing-key MATLAB behaviour.
    pub fn legacy_missing_key(mut self, enabled: bool) -> Self {
        self.legacy_missing_key = enabled;
        self
    }
}
