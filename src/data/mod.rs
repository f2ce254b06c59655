pub mod idx;
pub mod image;

pub use idx::{read_test_set, read_train_set, Dataset, LabeledImage};
