use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::train::batch_stats::BatchStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`    — number of randomly drawn samples to train on, one update each
/// - `learning_rate` — step size, must be positive
/// - `momentum`      — fraction of the previous update re-applied, must be non-negative
/// - `report_every`  — window length for `BatchStats` and progress logging
/// - `progress_tx`   — optional channel; one `BatchStats` per completed window.
///                     If the receiver is dropped the loop stops early.
/// - `stop_flag`     — optional atomic flag checked at every window boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub iterations: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub report_every: usize,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<BatchStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(iterations: usize, learning_rate: f64, momentum: f64) -> Self {
        TrainConfig {
            iterations,
            learning_rate,
            momentum,
            report_every: 1000,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_report_every(mut self, report_every: usize) -> Self {
        self.report_every = report_every;
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(100_000, 0.001, 0.5)
    }
}
