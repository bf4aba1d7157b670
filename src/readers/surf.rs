//! Surface mesh reader.

use crate::data::{Surface, SurfaceSource};
use crate::error::{ensure_exists, NiioError, Result};
use crate::formats::GiftiImage;
use ndarray::{Array2, Ix2};
use std::path::Path;

/// Load a triangulated surface as vertices and faces.
///
/// GIFTI surfaces take data array 0 as vertices and data array 1 as faces.
/// FreeSurfer geometry files are read natively.
pub fn load_surf(path: &Path, source: impl Into<SurfaceSource>) -> Result<Surface> {
    ensure_exists(path)?;
    match source.into() {
        SurfaceSource::Gifti => gifti_surface(path),
        SurfaceSource::FreeSurfer => freesurfer_surface(path),
    }
}

fn gifti_surface(path: &Path) -> Result<Surface> {
    let gii = GiftiImage::read(path).map_err(|e| NiioError::read_failure(path, e))?;
    let (points, triangles) = match gii.darrays.as_slice() {
        [points, triangles, ..] => (points, triangles),
        [_] => return Err(NiioError::missing_key(path, "data array 1")),
        [] => return Err(NiioError::missing_key(path, "data array 0")),
    };

    let vertices = points
        .to_f64()
        .map_err(|e| NiioError::read_failure(path, e))?
        .into_dimensionality::<Ix2>()
        .map_err(|e| NiioError::read_failure(path, format!("vertex array: {}", e)))?;
    let faces = triangles
        .to_i32()
        .map_err(|e| NiioError::read_failure(path, format!("face array: {}", e)))?
        .into_dimensionality::<Ix2>()
        .map_err(|e| NiioError::read_failure(path, format!("face array: {}", e)))?;

    tracing::debug!(
        "Read GIFTI surface with {} vertices and {} faces",
        vertices.nrows(),
        faces.nrows()
    );
    Ok(Surface::new(vertices, faces))
}

fn freesurfer_surface(path: &Path) -> Result<Surface> {
    let surf = neuroformats::read_surf(path)
        .map_err(|e| NiioError::read_failure(path, format!("{:?}", e)))?;
    let mesh = surf.mesh;

    let vertices = Array2::from_shape_vec(
        (mesh.vertices.len() / 3, 3),
        mesh.vertices.iter().map(|&v| f64::from(v)).collect(),
    )
    .map_err(|e| NiioError::read_failure(path, format!("vertex array: {}", e)))?;
    let faces = Array2::from_shape_vec((mesh.faces.len() / 3, 3), mesh.faces)
        .map_err(|e| NiioError::read_failure(path, format!("face array: {}", e)))?;

    tracing::debug!(
        "Read FreeSurfer surface with {} vertices and {} faces",
        vertices.nrows(),
        faces.nrows()
    );
    Ok(Surface::new(vertices, faces))
}
