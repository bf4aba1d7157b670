//! Neuroimaging images opened by suffix.

use super::gifti::GiftiImage;
use super::nifti2;
use crate::error::{NiioError, Result};
use flate2::read::GzDecoder;
use ndarray::{ArrayD, Dimension, IxDyn};
use nifti::{NiftiObject, NiftiVolume, RandomAccessNiftiVolume, ReaderOptions};
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// An opened image container.
#[derive(Debug)]
pub enum Image {
    /// Surface data: a list of data arrays.
    Gifti(GiftiImage),
    /// Volumetric data: one embedded array, already scaled.
    Nifti(ArrayD<f64>),
}

impl Image {
    /// Open an image, choosing the backend from the file name.
    ///
    /// `.gii` is GIFTI, `.nii` and `.nii.gz` are NIfTI-1 or NIfTI-2. Anything
    /// else is an unsupported container.
    pub fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".gii") {
            tracing::debug!("Reading GIFTI image {}", path.display());
            GiftiImage::read(path)
                .map(Image::Gifti)
                .map_err(|e| NiioError::read_failure(path, e))
        } else if name.ends_with(".nii") || name.ends_with(".nii.gz") {
            tracing::debug!("Reading NIfTI image {}", path.display());
            read_nifti(path).map(Image::Nifti)
        } else {
            Err(NiioError::unsupported_container(
                path,
                format!("image type {:?}", name),
            ))
        }
    }
}

fn read_nifti(path: &Path) -> Result<ArrayD<f64>> {
    let bytes = read_maybe_gzipped(path)?;
    if nifti2::is_nifti2(&bytes) {
        tracing::debug!("{} has a NIfTI-2 header", path.display());
        return nifti2::read_volume(&bytes).map_err(|e| NiioError::read_failure(path, e));
    }
    read_nifti1(path)
}

fn read_maybe_gzipped(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path).map_err(|e| NiioError::read_failure(path, e))?;
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }
    let mut bytes = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut bytes)
        .map_err(|e| NiioError::read_failure(path, e))?;
    Ok(bytes)
}

fn read_nifti1(path: &Path) -> Result<ArrayD<f64>> {
    let object = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| NiioError::read_failure(path, e))?;
    let volume = object.volume();

    let dims: Vec<usize> = volume.dim().iter().map(|&d| d as usize).collect();
    let mut values = Vec::with_capacity(dims.iter().product());
    for index in ndarray::indices(IxDyn(&dims)) {
        let coords: Vec<u16> = index.slice().iter().map(|&i| i as u16).collect();
        let value = volume
            .get_f64(&coords)
            .map_err(|e| NiioError::read_failure(path, e))?;
        values.push(value);
    }

    ArrayD::from_shape_vec(IxDyn(&dims), values)
        .map_err(|e| NiioError::read_failure(path, format!("invalid volume shape: {}", e)))
}
