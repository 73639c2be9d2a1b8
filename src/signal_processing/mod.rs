pub mod energy;
pub mod fir_core;
pub mod tone_filter;
pub mod waveform;

pub use energy::{ToneEnergies, ToneEnergyAccumulator};
pub use fir_core::StreamingFirFilter;
pub use tone_filter::{ToneFilterBank, design_tone_taps};
pub use waveform::{generate_cosine, generate_sine, mix_arrays};
