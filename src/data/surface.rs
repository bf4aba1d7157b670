//! Triangulated surface meshes.

use ndarray::Array2;

/// Where a surface mesh comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceSource {
    /// GIFTI file: data array 0 holds vertices, data array 1 holds faces.
    #[default]
    Gifti,
    /// FreeSurfer binary geometry file (`lh.white`, `rh.pial`, ...).
    FreeSurfer,
}

impl From<bool> for SurfaceSource {
    /// `true` selects GIFTI, `false` the FreeSurfer geometry reader.
    fn from(gifti: bool) -> Self {
        if gifti {
            SurfaceSource::Gifti
        } else {
            SurfaceSource::FreeSurfer
        }
    }
}

/// A brain surface mesh.
///
/// Face indices are not checked against the vertex count.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Vertex coordinates, one row per vertex.
    pub vertices: Array2<f64>,
    /// Triangles, one row of vertex indices per face.
    pub faces: Array2<i32>,
}

impl Surface {
    /// Create a new surface.
    pub fn new(vertices: Array2<f64>, faces: Array2<i32>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.nrows()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.nrows()
    }

    /// Split into the `(vertices, faces)` pair.
    pub fn into_pair(self) -> (Array2<f64>, Array2<i32>) {
        (self.vertices, self.faces)
    }
}
