pub mod classifier;
pub mod key;

pub use classifier::DtmfClassifier;
pub use key::{DtmfKey, parse_keys};
