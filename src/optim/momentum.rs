use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;

/// Previous update applied to every weight and bias, mirroring a network's shapes.
///
/// `delta_weights[l]` matches `layers[l].weights`; `delta_biases[l]` matches
/// `layers[l].biases` (the input layer's entry is never written). Training-session
/// local: never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumState {
    pub delta_weights: Vec<Matrix>,
    pub delta_biases: Vec<Vec<f64>>,
}

impl MomentumState {
    /// Zeroed state sized for `layers`.
    pub fn for_layers(layers: &[Layer]) -> MomentumState {
        MomentumState {
            delta_weights: layers.iter()
                .map(|layer| Matrix::zeros(layer.weights.rows, layer.weights.cols))
                .collect(),
            delta_biases: layers.iter()
                .map(|layer| vec![0.0; layer.biases.len()])
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        for deltas in &mut self.delta_weights {
            deltas.fill(0.0);
        }
        for deltas in &mut self.delta_biases {
            deltas.iter_mut().for_each(|d| *d = 0.0);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.delta_weights.iter().all(|m| m.data.iter().flatten().all(|&d| d == 0.0))
            && self.delta_biases.iter().flatten().all(|&d| d == 0.0)
    }
}
