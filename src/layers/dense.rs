use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// One stage of a fully connected network.
///
/// `weights` holds the *outgoing* connections: `weights.data[i][k]` links neuron `i`
/// of this layer to neuron `k` of the next one. The output layer has a
/// `size × 0` weight matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Cached post-sigmoid activations of the last forward pass.
    pub neurons: Vec<f64>,
    pub biases: Vec<f64>,
    pub weights: Matrix,
}

impl Layer {
    /// Zeroed activations; biases and weights uniform in `[-1, 1]`.
    pub fn new<R: Rng + ?Sized>(size: usize, next_size: usize, rng: &mut R) -> Layer {
        let biases = (0..size).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        let weights = Matrix::random_uniform(size, next_size, rng);

        Layer {
            neurons: vec![0.0; size],
            biases,
            weights,
        }
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    /// Number of neurons in the layer these weights feed into.
    pub fn next_size(&self) -> usize {
        self.weights.cols
    }

    pub fn clear(&mut self) {
        self.neurons.iter_mut().for_each(|n| *n = 0.0);
    }
}
