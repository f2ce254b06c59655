pub mod batch_stats;
pub mod evaluate;
pub mod loop_fn;
pub mod train_config;

pub use batch_stats::BatchStats;
pub use evaluate::{argmax, evaluate, one_hot, Evaluation};
pub use loop_fn::train_loop;
pub use train_config::TrainConfig;
