#![allow(dead_code)]

use touchtone::DtmfKey;
use touchtone::dtmf::parse_keys;
use touchtone::simulation::{
    NoiseConfig, SequenceConfig, apply_noise, generate_dual_tone, generate_key_sequence, quantize,
    silence,
};

/// 16-bit samples dialing `keys` with the default sequence timing
pub fn dial(keys: &str, sample_rate: u32) -> Vec<i32> {
    dial_with(keys, &SequenceConfig::default(), sample_rate)
}

pub fn dial_with(keys: &str, config: &SequenceConfig, sample_rate: u32) -> Vec<i32> {
    let keys = parse_keys(keys).expect("valid key string");
    quantize(&generate_key_sequence(&keys, config, sample_rate), 16)
}

pub fn dial_noisy(keys: &str, sample_rate: u32, noise: &NoiseConfig) -> Vec<i32> {
    let keys = parse_keys(keys).expect("valid key string");
    let mut signal = generate_key_sequence(&keys, &SequenceConfig::default(), sample_rate);
    apply_noise(&mut signal, noise);
    quantize(&signal, 16)
}

/// An arbitrary tone pair framed by silence
pub fn tone_pair(
    low_hz: f32,
    high_hz: f32,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> Vec<i32> {
    let mut signal = silence(0.05, sample_rate);
    signal.extend(generate_dual_tone(
        low_hz,
        high_hz,
        amplitude,
        duration_secs,
        sample_rate,
    ));
    signal.extend(silence(0.05, sample_rate));
    quantize(&signal, 16)
}

pub fn keys_to_string(keys: &[DtmfKey]) -> String {
    keys.iter().map(|k| k.as_char()).collect()
}
