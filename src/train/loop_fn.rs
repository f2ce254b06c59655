use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::{info, warn};

use crate::data::idx::Dataset;
use crate::error::{check_len, NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::batch_stats::BatchStats;
use crate::train::evaluate::{argmax, one_hot};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` online on `config.iterations` samples drawn uniformly at
/// random from `dataset`, one weight update per sample.
///
/// Returns the summed squared error of the last completed reporting window, or
/// of the trailing partial window when no window completed.
///
/// # Early termination
/// The loop stops at a window boundary if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64> {
    let optimizer = Sgd::new(config.learning_rate, config.momentum)?;
    if config.report_every == 0 {
        return Err(NetworkError::InvalidConfiguration(
            "report_every must be at least 1".to_owned(),
        ));
    }
    if dataset.is_empty() {
        return Err(NetworkError::Dataset("training set is empty".to_owned()));
    }
    if let Err(err) = check_len("image", network.input_size(), dataset.pixel_count()) {
        warn!(
            sizes = ?network.layer_sizes(),
            width = dataset.width,
            height = dataset.height,
            "network input does not match dataset images"
        );
        return Err(err);
    }

    let n_classes = network.output_size();
    let mut window = Window::default();
    let mut last_error = None;
    let t_start = Instant::now();

    for i in 0..config.iterations {
        let image = &dataset.images[rng.gen_range(0..dataset.len())];
        let input = image.normalized();
        let target = one_hot(image.label, n_classes)?;

        let output = network.feed_forward(&input)?;
        if argmax(output) == image.label {
            window.right += 1;
        }
        window.error += MseLoss::squared_error(output, &target);
        window.samples += 1;

        optimizer.step(network, &target)?;

        if (i + 1) % config.report_every == 0 {
            let stats = window.finish(i / config.report_every);
            info!(
                batch = stats.batch,
                right = stats.right,
                error = stats.error,
                elapsed_ms = t_start.elapsed().as_millis() as u64,
                "training progress"
            );
            last_error = Some(stats.error);

            if let Some(ref tx) = config.progress_tx {
                // If the receiver has been dropped, stop training.
                if tx.send(stats).is_err() {
                    break;
                }
            }
            if let Some(ref flag) = config.stop_flag {
                if flag.load(Ordering::Relaxed) {
                    info!(iterations = i + 1, "training stopped");
                    break;
                }
            }
        }
    }

    Ok(last_error.unwrap_or(window.error))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Counters for the reporting window in progress.
#[derive(Default)]
struct Window {
    right: usize,
    error: f64,
    samples: usize,
}

impl Window {
    fn finish(&mut self, batch: usize) -> BatchStats {
        let done = std::mem::take(self);
        BatchStats {
            batch,
            right: done.right,
            error: done.error,
            samples: done.samples,
        }
    }
}
