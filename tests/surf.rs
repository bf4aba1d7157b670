mod common;

use common::{write_freesurfer_surf, write_gifti, GiiArray};
use ndarray::arr2;
use niio::{load_surf, NiioError, SurfaceSource};
use tempfile::tempdir;

const VERTICES: [f64; 12] = [
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0,
];
const FACES: [f64; 6] = [0.0, 1.0, 2.0, 0.0, 2.0, 3.0];

#[test]
fn gifti_surface_pairs_first_two_arrays() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lh.pial.surf.gii");
    write_gifti(
        &path,
        &[
            GiiArray::points(&[4, 3], &VERTICES),
            GiiArray::triangles(&[2, 3], &FACES),
        ],
    );

    let (vertices, faces) = load_surf(&path, true).unwrap().into_pair();
    assert_eq!(
        vertices,
        arr2(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ])
    );
    assert_eq!(faces, arr2(&[[0, 1, 2], [0, 2, 3]]));

    assert_eq!(
        load_surf(&path, SurfaceSource::Gifti).unwrap(),
        load_surf(&path, SurfaceSource::Gifti).unwrap()
    );
}

#[test]
fn gifti_surface_needs_two_arrays() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("points.gii");
    write_gifti(&path, &[GiiArray::points(&[4, 3], &VERTICES)]);

    let err = load_surf(&path, SurfaceSource::Gifti).unwrap_err();
    assert!(matches!(err, NiioError::MissingKey { .. }));
}

#[test]
fn float_faces_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("floats.gii");
    write_gifti(
        &path,
        &[
            GiiArray::points(&[4, 3], &VERTICES),
            GiiArray::floats(&[2, 3], &FACES),
        ],
    );

    let err = load_surf(&path, SurfaceSource::Gifti).unwrap_err();
    assert!(matches!(err, NiioError::ReadFailure { .. }));
}

#[test]
fn freesurfer_geometry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lh.white");
    write_freesurfer_surf(
        &path,
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        &[[0, 1, 2]],
    );

    let surface = load_surf(&path, false).unwrap();
    assert_eq!(surface.num_vertices(), 3);
    assert_eq!(surface.num_faces(), 1);
    assert_eq!(surface.vertices[[1, 0]], 1.0);
    assert_eq!(surface.faces, arr2(&[[0, 1, 2]]));
}

#[test]
fn missing_surface_file() {
    let err = load_surf(std::path::Path::new("/nonexistent/lh.white"), false).unwrap_err();
    assert!(matches!(err, NiioError::MissingFile { .. }));
}
