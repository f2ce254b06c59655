pub mod momentum;
pub mod sgd;

pub use momentum::MomentumState;
pub use sgd::Sgd;
