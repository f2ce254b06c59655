//! Image preprocessing for single-image classification.
//!
//! Decodes image bytes (PNG/JPEG/BMP/GIF), resizes them to the dataset grid,
//! converts to grayscale and normalizes pixel values to [0, 1].
use std::path::Path;

use crate::error::{NetworkError, Result};

/// Returns a flat row-major `Vec<f64>` of length `width * height`.
pub fn image_bytes_to_grayscale_input(bytes: &[u8], width: u32, height: u32) -> Result<Vec<f64>> {
    let img = image::load_from_memory(bytes).map_err(|e| NetworkError::Image(e.to_string()))?;
    let resized = img.resize_exact(width, height, image::imageops::FilterType::Lanczos3);
    let gray = resized.to_luma8();
    Ok(gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect())
}

pub fn load_grayscale_input<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Vec<f64>> {
    let bytes = std::fs::read(path)?;
    image_bytes_to_grayscale_input(&bytes, width, height)
}
