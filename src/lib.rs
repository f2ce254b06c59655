pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod optim;
pub mod network;
pub mod loss;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::sigmoid::{sigmoid, sigmoid_derivative};
pub use layers::dense::Layer;
pub use network::network::Network;
pub use optim::{momentum::MomentumState, sgd::Sgd};
pub use loss::mse::MseLoss;
pub use data::idx::{Dataset, LabeledImage};
pub use train::{evaluate, train_loop, BatchStats, Evaluation, TrainConfig};
