use serde::{Serialize, Deserialize};
use tracing::info;

use crate::data::idx::Dataset;
use crate::error::{check_len, NetworkError, Result};
use crate::network::network::Network;

/// Classification result over a whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub right: usize,
    pub total: usize,
}

impl Evaluation {
    /// Fraction in [0, 1]; 0 for an empty dataset.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.right as f64 / self.total as f64
    }
}

/// Counts how many images of `dataset` the network classifies correctly.
pub fn evaluate(network: &mut Network, dataset: &Dataset) -> Result<Evaluation> {
    check_len("image", network.input_size(), dataset.pixel_count())?;

    let mut right = 0;
    for image in &dataset.images {
        let output = network.feed_forward(&image.normalized())?;
        if argmax(output) == image.label {
            right += 1;
        }
    }

    let evaluation = Evaluation { right, total: dataset.len() };
    info!(right, total = evaluation.total, accuracy = evaluation.accuracy(), "evaluation finished");
    Ok(evaluation)
}

/// Index of the largest value; ties go to the lowest index, 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Vector of `n_classes` zeros with 1.0 at `label`.
pub fn one_hot(label: usize, n_classes: usize) -> Result<Vec<f64>> {
    if label >= n_classes {
        return Err(NetworkError::Dataset(format!(
            "label {} is out of range for {} output classes",
            label, n_classes
        )));
    }
    let mut target = vec![0.0; n_classes];
    target[label] = 1.0;
    Ok(target)
}
