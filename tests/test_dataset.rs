// IDX dataset parsing and loading.

mod common;

use sigmoid_mlp::data::idx::{read_test_set, read_train_set, TRAIN_IMAGES, TRAIN_LABELS};
use sigmoid_mlp::{Dataset, NetworkError};

#[test]
fn parses_pixel_grids_and_labels() {
    let images = common::idx3(2, 3, &[vec![0, 1, 2, 3, 4, 5], vec![255, 0, 255, 0, 255, 0]]);
    let labels = common::idx1(&[7, 2]);
    let dataset = Dataset::parse(&images, &labels).unwrap();

    assert_eq!((dataset.width, dataset.height), (3, 2));
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.get(0).unwrap().pixels, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert_eq!(dataset.get(1).unwrap().label, 2);
    assert!(dataset.get(2).is_none());
}

#[test]
fn input_is_normalized_row_major() {
    let images = common::idx3(1, 3, &[vec![0, 51, 255]]);
    let dataset = Dataset::parse(&images, &common::idx1(&[0])).unwrap();
    assert_eq!(dataset.input(0).unwrap(), vec![0.0, 0.2, 1.0]);
    assert_eq!(dataset.pixel_count(), 3);
}

#[test]
fn rejects_wrong_dimension_byte() {
    let labels = common::idx1(&[0]);
    // A label file where an image file is expected.
    let err = Dataset::parse(&labels, &labels).unwrap_err();
    assert!(matches!(err, NetworkError::Dataset(_)));
}

#[test]
fn rejects_truncated_pixel_data() {
    let mut images = common::idx3(2, 2, &[vec![1, 2, 3, 4]]);
    images.pop();
    let err = Dataset::parse(&images, &common::idx1(&[1])).unwrap_err();
    assert!(matches!(err, NetworkError::Dataset(_)));
}

#[test]
fn rejects_count_disagreement() {
    let images = common::idx3(1, 1, &[vec![1], vec![2]]);
    let err = Dataset::parse(&images, &common::idx1(&[1])).unwrap_err();
    assert!(matches!(err, NetworkError::Dataset(_)));
}

#[test]
fn reads_train_set_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(TRAIN_IMAGES), common::idx3(2, 2, &[vec![9, 9, 9, 9]])).unwrap();
    std::fs::write(dir.path().join(TRAIN_LABELS), common::idx1(&[4])).unwrap();

    let dataset = read_train_set(dir.path()).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.images[0].label, 4);

    assert!(matches!(read_test_set(dir.path()), Err(NetworkError::Io(_))));
}

#[test]
fn rejects_empty_pixel_grid_with_declared_images() {
    let images = common::idx3(0, 28, &[vec![], vec![]]);
    let err = Dataset::parse(&images, &common::idx1(&[3, 4])).unwrap_err();
    assert!(matches!(err, NetworkError::Dataset(_)));
}

#[test]
fn accepts_empty_file_with_empty_grid() {
    let dataset = Dataset::parse(&common::idx3(0, 0, &[]), &common::idx1(&[])).unwrap();
    assert!(dataset.is_empty());
}
