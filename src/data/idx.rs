//! MNIST-style datasets stored as a pair of IDX binary files.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```
use std::path::Path;

use tracing::debug;

use crate::error::{NetworkError, Result};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// One grayscale image: `pixels[row][col]`, values in `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImage {
    pub pixels: Vec<Vec<u8>>,
    pub label: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub width: usize,
    pub height: usize,
    pub images: Vec<LabeledImage>,
}

impl Dataset {
    /// Parses an IDX3 image buffer and its matching IDX1 label buffer.
    pub fn parse(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Dataset> {
        check_header("image", image_bytes, 0x03, 16)?;
        check_header("label", label_bytes, 0x01, 8)?;

        let n_items = read_u32(image_bytes, 4);
        let height = read_u32(image_bytes, 8);
        let width = read_u32(image_bytes, 12);

        let n_pixels = height.checked_mul(width).ok_or_else(|| {
            dataset_error(format!("rows * cols overflows (rows={}, cols={})", height, width))
        })?;
        if n_pixels == 0 && n_items > 0 {
            return Err(dataset_error(format!(
                "image file declares {} images with an empty {}x{} pixel grid",
                n_items, height, width
            )));
        }
        let required_image_len = n_items.checked_mul(n_pixels)
            .and_then(|n| n.checked_add(16))
            .ok_or_else(|| dataset_error("image data length overflows".to_owned()))?;
        if image_bytes.len() < required_image_len {
            return Err(dataset_error(format!(
                "image file declares {} images of {}x{} pixels ({} bytes) but is only {} bytes",
                n_items, height, width, required_image_len, image_bytes.len()
            )));
        }

        let label_count = read_u32(label_bytes, 4);
        if label_count != n_items {
            return Err(dataset_error(format!(
                "image file declares {} items but label file declares {}",
                n_items, label_count
            )));
        }
        if label_bytes.len() < 8 + n_items {
            return Err(dataset_error(format!(
                "label file declares {} labels but is only {} bytes",
                n_items, label_bytes.len()
            )));
        }

        let images = if n_pixels == 0 {
            Vec::new()
        } else {
            image_bytes[16..required_image_len]
                .chunks_exact(n_pixels)
                .zip(label_bytes[8..8 + n_items].iter())
                .map(|(chunk, &label)| LabeledImage {
                    pixels: chunk.chunks_exact(width).map(<[u8]>::to_vec).collect(),
                    label: label as usize,
                })
                .collect()
        };

        Ok(Dataset { width, height, images })
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(images_path: P, labels_path: Q) -> Result<Dataset> {
        let image_bytes = std::fs::read(images_path.as_ref())?;
        let label_bytes = std::fs::read(labels_path.as_ref())?;
        let dataset = Dataset::parse(&image_bytes, &label_bytes)?;
        debug!(
            path = %images_path.as_ref().display(),
            images = dataset.len(),
            width = dataset.width,
            height = dataset.height,
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn get(&self, index: usize) -> Option<&LabeledImage> {
        self.images.get(index)
    }

    /// Row-major pixels of image `index` scaled from `[0, 255]` to `[0, 1]`.
    pub fn input(&self, index: usize) -> Option<Vec<f64>> {
        self.get(index).map(LabeledImage::normalized)
    }
}

impl LabeledImage {
    pub fn normalized(&self) -> Vec<f64> {
        self.pixels.iter()
            .flatten()
            .map(|&px| px as f64 / 255.0)
            .collect()
    }
}

pub fn read_train_set<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
    let dir = dir.as_ref();
    Dataset::load(dir.join(TRAIN_IMAGES), dir.join(TRAIN_LABELS))
}

pub fn read_test_set<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
    let dir = dir.as_ref();
    Dataset::load(dir.join(TEST_IMAGES), dir.join(TEST_LABELS))
}

fn dataset_error(message: String) -> NetworkError {
    NetworkError::Dataset(message)
}

fn read_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([
        bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3],
    ]) as usize
}

fn check_header(kind: &str, bytes: &[u8], dimensions: u8, header_len: usize) -> Result<()> {
    if bytes.len() < header_len {
        return Err(dataset_error(format!(
            "{} file too short: expected at least {} header bytes, got {}",
            kind, header_len, bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(dataset_error(format!(
            "{} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(dataset_error(format!(
            "{} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dimensions {
        return Err(dataset_error(format!(
            "{} file: expected {} dimensions, got {}",
            kind, dimensions, bytes[3]
        )));
    }
    Ok(())
}
