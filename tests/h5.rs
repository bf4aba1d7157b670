use ndarray::{arr1, arr2};
use niio::{load_h5, DatasetSelector, NiioError};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture(dir: &Path) -> PathBuf {
    let path = dir.join("scores.h5");
    let file = hdf5::File::create(&path).unwrap();
    file.new_dataset_builder()
        .with_data(&arr1(&[1.0, 2.0, 3.0]))
        .create("top")
        .unwrap();

    let group = file.create_group("subgroup").unwrap();
    group
        .new_dataset_builder()
        .with_data(&arr2(&[[1i32, 2], [3, 4]]))
        .create("labels")
        .unwrap();
    group
        .new_dataset_builder()
        .with_data(&arr1(&[0.5f32, 1.5]))
        .create("weights")
        .unwrap();
    group.create_group("nested").unwrap();
    path
}

#[test]
fn group_without_datasets_reads_direct_members() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    let data = load_h5(&path, None, Some("subgroup")).unwrap();
    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["labels", "weights"]);
    assert_eq!(data["labels"], arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn());
    assert_eq!(data["weights"], arr1(&[0.5, 1.5]).into_dyn());
}

#[test]
fn top_level_default_reads_root_datasets() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    let data = load_h5(&path, None, None).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data["top"], arr1(&[1.0, 2.0, 3.0]).into_dyn());
}

#[test]
fn explicit_datasets_are_read() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    let selector = DatasetSelector::Names(vec!["weights".into()]);
    let data = load_h5(&path, Some(&selector), Some("subgroup")).unwrap();
    assert_eq!(data.len(), 1);
    assert!(data.contains_key("weights"));
}

#[test]
fn missing_key_fails() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    let selector = DatasetSelector::Names(vec!["top".into(), "absent".into()]);
    let err = load_h5(&path, Some(&selector), None).unwrap_err();
    assert!(matches!(err, NiioError::MissingKey { ref key, .. } if key == "absent"));
}

#[test]
fn missing_group_fails() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    let err = load_h5(&path, None, Some("absent")).unwrap_err();
    assert!(matches!(err, NiioError::MissingGroup { ref group, .. } if group == "absent"));
}

#[test]
fn requesting_a_group_as_dataset_is_unsupported() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    let selector = DatasetSelector::Name("nested".into());
    let err = load_h5(&path, Some(&selector), Some("subgroup")).unwrap_err();
    assert!(matches!(err, NiioError::UnsupportedContainer { .. }));
}

#[test]
fn missing_file_fails() {
    let err = load_h5(Path::new("/nonexistent/niio/scores.h5"), None, None).unwrap_err();
    assert!(matches!(err, NiioError::MissingFile { .. }));
}

#[test]
fn non_hdf5_file_is_a_read_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.h5");
    std::fs::write(&path, b"plain text").unwrap();

    let err = load_h5(&path, None, None).unwrap_err();
    assert!(matches!(err, NiioError::ReadFailure { .. }));
}

#[test]
fn reading_twice_gives_equal_results() {
    let dir = tempdir().unwrap();
    let path = fixture(dir.path());

    assert_eq!(
        load_h5(&path, None, Some("subgroup")).unwrap(),
        load_h5(&path, None, Some("subgroup")).unwrap()
    );
}
