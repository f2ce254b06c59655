pub struct MseLoss;

impl MseLoss {
    /// Σ(target - output)² over one sample; the error figure reported while training.
    pub fn squared_error(outputs: &[f64], targets: &[f64]) -> f64 {
        outputs.iter().zip(targets.iter())
            .map(|(o, t)| (t - o).powi(2))
            .sum()
    }
}
