//! Shape normalization shared by the readers.

use crate::error::{NiioError, Result};
use ndarray::{concatenate, ArrayD, ArrayViewD, Axis};

/// Remove every axis of length one.
///
/// An array made only of singleton axes becomes zero-dimensional.
pub fn squeeze(mut array: ArrayD<f64>) -> ArrayD<f64> {
    while let Some(axis) = array.shape().iter().position(|&len| len == 1) {
        array = array.index_axis_move(Axis(axis), 0);
    }
    array
}

/// Reverse the axis order, turning HDF5 row-major layout into MATLAB's.
pub fn transpose(array: ArrayD<f64>) -> ArrayD<f64> {
    array.reversed_axes()
}

/// Stack arrays as columns of a 2-D array.
///
/// Zero- and one-dimensional inputs each contribute one column, two-dimensional
/// inputs contribute all their columns. Rows must agree across inputs, and
/// there must be at least one input.
pub fn column_stack(arrays: &[ArrayD<f64>]) -> Result<ArrayD<f64>> {
    if arrays.is_empty() {
        return Err(NiioError::ShapeMismatch("no arrays to stack".to_string()));
    }

    let columns: Vec<ArrayViewD<'_, f64>> = arrays
        .iter()
        .map(|a| match a.ndim() {
            0 => a.view().insert_axis(Axis(0)).insert_axis(Axis(1)),
            1 => a.view().insert_axis(Axis(1)),
            _ => a.view(),
        })
        .collect();

    concatenate(Axis(1), &columns).map_err(|e| {
        let shapes: Vec<&[usize]> = arrays.iter().map(|a| a.shape()).collect();
        NiioError::ShapeMismatch(format!("cannot column-stack {:?}: {}", shapes, e))
    })
}
