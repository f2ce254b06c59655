use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::sigmoid::{sigmoid, sigmoid_derivative};
use crate::error::{check_len, NetworkError, Result};
use crate::layers::dense::Layer;
use crate::optim::momentum::MomentumState;

/// A fully connected sigmoid network plus the momentum state of its training run.
///
/// Only `layers` is serialized. Momentum and the forward-pass marker are rebuilt
/// whenever a network is constructed or loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<Layer>,
    #[serde(skip)]
    momentum: MomentumState,
    /// Set by `feed_forward`, consumed by `back_propagate`.
    #[serde(skip)]
    pass_ready: bool,
}

impl Network {
    /// Builds a network with one layer per entry of `layer_sizes`, weights and
    /// biases drawn uniformly from `[-1, 1]`.
    pub fn create<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Network> {
        if layer_sizes.len() < 2 {
            return Err(NetworkError::InvalidConfiguration(format!(
                "a network needs at least 2 layers, got {}",
                layer_sizes.len()
            )));
        }
        if let Some(pos) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer {} has size 0; every layer needs at least one neuron",
                pos
            )));
        }

        let layers: Vec<Layer> = layer_sizes.iter()
            .enumerate()
            .map(|(i, &size)| {
                let next_size = layer_sizes.get(i + 1).copied().unwrap_or(0);
                Layer::new(size, next_size, &mut *rng)
            })
            .collect();

        debug!(sizes = ?layer_sizes, "created network");
        Ok(Network::assemble(layers))
    }

    /// Wraps explicitly built layers, checking the shape invariants.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        let network = Network::assemble(layers);
        network.validate()?;
        Ok(network)
    }

    fn assemble(layers: Vec<Layer>) -> Network {
        let momentum = MomentumState::for_layers(&layers);
        Network { layers, momentum, pass_ready: false }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::size).collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    pub fn momentum(&self) -> &MomentumState {
        &self.momentum
    }

    /// Forgets all previous updates so training restarts without momentum carry-over.
    pub fn reset_momentum(&mut self) {
        self.momentum.reset();
    }

    /// Checks that every layer is non-empty, internally consistent, and that each
    /// weight matrix has exactly as many columns as the next layer has neurons.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(NetworkError::InvalidConfiguration(format!(
                "a network needs at least 2 layers, got {}",
                self.layers.len()
            )));
        }
        for (l, layer) in self.layers.iter().enumerate() {
            let size = layer.size();
            let next_size = self.layers.get(l + 1).map_or(0, Layer::size);
            if size == 0 {
                return Err(NetworkError::InvalidConfiguration(format!("layer {} is empty", l)));
            }
            if layer.biases.len() != size {
                return Err(NetworkError::InvalidConfiguration(format!(
                    "layer {} has {} neurons but {} biases",
                    l, size, layer.biases.len()
                )));
            }
            if !layer.weights.is_consistent()
                || layer.weights.rows != size
                || layer.weights.cols != next_size
            {
                return Err(NetworkError::InvalidConfiguration(format!(
                    "layer {} weights are {}x{}, expected {}x{}",
                    l, layer.weights.data.len(), layer.weights.cols, size, next_size
                )));
            }
        }
        Ok(())
    }

    /// Propagates `inputs` through every layer and returns the output activations.
    ///
    /// The returned slice borrows the network's cached activations; it is
    /// overwritten by the next forward pass.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<&[f64]> {
        check_len("input", self.input_size(), inputs.len())?;

        self.layers[0].neurons.copy_from_slice(inputs);

        for l in 1..self.layers.len() {
            let (lower, upper) = self.layers.split_at_mut(l);
            let prev = &lower[l - 1];
            let current = &mut upper[0];

            for (i, neuron) in current.neurons.iter_mut().enumerate() {
                let sum: f64 = prev.neurons.iter()
                    .zip(prev.weights.data.iter())
                    .map(|(activation, row)| activation * row[i])
                    .sum();
                *neuron = sigmoid(sum + current.biases[i]);
            }
        }

        self.pass_ready = true;
        Ok(&self.layers[self.layers.len() - 1].neurons)
    }

    /// One online training step against the sample of the last forward pass.
    ///
    /// Each weight moves by `learning_rate * gradient * activation` plus
    /// `momentum` times its previous move; biases likewise without the activation
    /// factor. Error for the upstream layer is computed from the weights as they
    /// were before this boundary's update.
    pub fn back_propagate(&mut self, targets: &[f64], learning_rate: f64, momentum: f64) -> Result<()> {
        check_len("target", self.output_size(), targets.len())?;
        if !self.pass_ready {
            return Err(NetworkError::StalePassState);
        }
        self.pass_ready = false;

        let last = self.layers.len() - 1;
        let mut error: Vec<f64> = targets.iter()
            .zip(self.layers[last].neurons.iter())
            .map(|(target, activation)| target - activation)
            .collect();

        for l in (0..last).rev() {
            let (lower, upper) = self.layers.split_at_mut(l + 1);
            let src = &mut lower[l];
            let dst = &mut upper[0];

            let gradient: Vec<f64> = error.iter()
                .zip(dst.neurons.iter())
                .map(|(e, &activation)| e * sigmoid_derivative(activation))
                .collect();

            // The input layer has no upstream error to feed.
            let error_next: Vec<f64> = if l > 0 {
                src.weights.data.iter()
                    .map(|row| row.iter().zip(error.iter()).map(|(w, e)| w * e).sum::<f64>())
                    .collect()
            } else {
                Vec::new()
            };

            let delta_weights = &mut self.momentum.delta_weights[l];
            for (i, row) in src.weights.data.iter_mut().enumerate() {
                let activation = src.neurons[i];
                for (k, weight) in row.iter_mut().enumerate() {
                    let delta = learning_rate * gradient[k] * activation
                        + momentum * delta_weights.data[i][k];
                    *weight += delta;
                    delta_weights.data[i][k] = delta;
                }
            }

            let delta_biases = &mut self.momentum.delta_biases[l + 1];
            for (k, bias) in dst.biases.iter_mut().enumerate() {
                let delta = learning_rate * gradient[k] + momentum * delta_biases[k];
                *bias += delta;
                delta_biases[k] = delta;
            }

            error = error_next;
        }

        Ok(())
    }

    /// Zeroes every activation. Weights, biases and momentum are untouched.
    pub fn clear_activations(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        self.pass_ready = false;
    }

    /// Fails with `InvalidConfiguration` if any weight or bias is NaN or infinite;
    /// JSON cannot represent those values.
    pub fn check_finite(&self) -> Result<()> {
        for (l, layer) in self.layers.iter().enumerate() {
            if layer.biases.iter().any(|b| !b.is_finite()) {
                return Err(NetworkError::InvalidConfiguration(format!(
                    "layer {} has a non-finite bias",
                    l
                )));
            }
            if layer.weights.data.iter().flatten().any(|w| !w.is_finite()) {
                return Err(NetworkError::InvalidConfiguration(format!(
                    "layer {} has a non-finite weight",
                    l
                )));
            }
        }
        Ok(())
    }

    /// Serializes the layers to a pretty-printed JSON file.
    ///
    /// The record is written to a sibling `.tmp` file and renamed over `path`,
    /// so an existing model survives a failed save.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.check_finite()?;

        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let written = File::create(&tmp_path).map_err(NetworkError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        });
        if let Err(err) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err);
        }
        std::fs::rename(&tmp_path, path)?;

        debug!(path = %path.display(), sizes = ?self.layer_sizes(), "saved network");
        Ok(())
    }

    /// Loads a network written by `save_json`, with fresh momentum state.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let network = Network::restore(serde_json::from_reader(reader)?)?;
        debug!(path = %path.as_ref().display(), sizes = ?network.layer_sizes(), "loaded network");
        Ok(network)
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.check_finite()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Network> {
        Network::restore(serde_json::from_str(json)?)
    }

    fn restore(loaded: Network) -> Result<Network> {
        Network::from_layers(loaded.layers)
    }
}
