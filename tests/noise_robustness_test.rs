mod test_signals;

use touchtone::simulation::NoiseConfig;
use touchtone::{DecoderConfig, DtmfProcessor};

const ALL_KEYS: &str = "0123456789*#ABCD";

fn decode_noisy(snr_db: f32, seed: u64) -> String {
    decode_with(&NoiseConfig::default().with_seed(seed).with_awgn(snr_db))
}

fn decode_with(noise: &NoiseConfig) -> String {
    let signal = test_signals::dial_noisy(ALL_KEYS, 8000, noise);

    let mut processor = DtmfProcessor::new(&DecoderConfig::default(), 8000, 16)
        .expect("Failed to create processor");
    processor
        .process_buffer(&signal)
        .expect("processing failed")
        .iter()
        .map(|d| d.key.as_char())
        .collect()
}

#[test]
fn test_clean_baseline() {
    assert_eq!(decode_with(&NoiseConfig::default()), ALL_KEYS);
}

#[test]
fn test_awgn_20db() {
    for seed in [1, 2, 3] {
        assert_eq!(decode_noisy(20.0, seed), ALL_KEYS, "seed {}", seed);
    }
}

#[test]
fn test_awgn_15db() {
    for seed in [11, 12] {
        assert_eq!(decode_noisy(15.0, seed), ALL_KEYS, "seed {}", seed);
    }
}
