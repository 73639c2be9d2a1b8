use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtmfError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("Filter overrun: window already holds {taps} samples awaiting a pull")]
    FilterOverrun { taps: usize },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DtmfError>;
