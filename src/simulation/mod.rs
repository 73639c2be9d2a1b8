mod noise;
mod signal;

pub use noise::{NoiseConfig, apply_noise, signal_power};
pub use signal::{
    SequenceConfig, generate_dual_tone, generate_key_sequence, generate_key_tone, quantize,
    silence,
};
