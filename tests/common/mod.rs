#![allow(dead_code)]

use sigmoid_mlp::{Layer, Matrix, Network};

/// Builds a layer with zeroed activations from explicit biases and outgoing weights.
pub fn layer(biases: Vec<f64>, weights: Vec<Vec<f64>>) -> Layer {
    Layer {
        neurons: vec![0.0; biases.len()],
        biases,
        weights: Matrix::from_data(weights),
    }
}

/// A [4, 3, 2] network with hand-picked parameters.
pub fn fixed_network() -> Network {
    Network::from_layers(vec![
        layer(
            vec![0.0; 4],
            vec![
                vec![0.1, 0.2, 0.3],
                vec![0.4, 0.5, 0.6],
                vec![-0.1, -0.2, -0.3],
                vec![0.7, -0.8, 0.9],
            ],
        ),
        layer(
            vec![0.1, -0.1, 0.2],
            vec![vec![0.5, -0.5], vec![0.3, 0.2], vec![-0.4, 0.6]],
        ),
        layer(vec![0.05, -0.05], vec![vec![], vec![]]),
    ])
    .unwrap()
}

pub fn squared_error(outputs: &[f64], targets: &[f64]) -> f64 {
    outputs.iter().zip(targets).map(|(o, t)| (t - o) * (t - o)).sum()
}

/// Encodes `images` (each `rows * cols` bytes) as an IDX3 buffer.
pub fn idx3(rows: u32, cols: u32, images: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x08, 0x03];
    bytes.extend_from_slice(&(images.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&rows.to_be_bytes());
    bytes.extend_from_slice(&cols.to_be_bytes());
    for image in images {
        bytes.extend_from_slice(image);
    }
    bytes
}

/// Encodes class labels as an IDX1 buffer.
pub fn idx1(labels: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x08, 0x01];
    bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    bytes.extend_from_slice(labels);
    bytes
}
