use serde::{Serialize, Deserialize};

/// Summary of one reporting window emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, one value is
/// sent every `report_every` iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// 0-based window number.
    pub batch: usize,
    /// Samples in the window whose argmax output matched the label.
    pub right: usize,
    /// Σ(target - output)² accumulated over the window, measured before each update.
    pub error: f64,
    /// Samples seen in the window.
    pub samples: usize,
}

impl BatchStats {
    pub fn accuracy(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.right as f64 / self.samples as f64
    }
}
