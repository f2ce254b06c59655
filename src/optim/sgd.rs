use crate::error::{NetworkError, Result};
use crate::network::network::Network;

/// Online SGD with classical momentum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
}

impl Sgd {
    /// Requires `learning_rate > 0` and `momentum >= 0`.
    pub fn new(learning_rate: f64, momentum: f64) -> Result<Sgd> {
        if !(learning_rate > 0.0) {
            return Err(NetworkError::InvalidConfiguration(format!(
                "learning rate must be positive, got {}",
                learning_rate
            )));
        }
        if !(momentum >= 0.0) {
            return Err(NetworkError::InvalidConfiguration(format!(
                "momentum must be non-negative, got {}",
                momentum
            )));
        }
        Ok(Sgd { learning_rate, momentum })
    }

    /// Applies one update for the sample the network was just fed.
    pub fn step(&self, network: &mut Network, targets: &[f64]) -> Result<()> {
        network.back_propagate(targets, self.learning_rate, self.momentum)
    }
}
