pub mod audio;
pub mod config;
pub mod constants;
pub mod dtmf;
pub mod error;
pub mod output;
pub mod processing;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::DecoderConfig;
pub use dtmf::DtmfKey;
pub use error::{DtmfError, Result};
pub use processing::{DecodeSummary, Detection, DtmfProcessor, decode_source};
pub use wav::save_wav;
