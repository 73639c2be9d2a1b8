use std::f64::consts::PI;

use crate::dtmf::DtmfKey;

/// Timing and level of a synthetic dialing sequence
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Tone-on time per key in seconds
    pub tone_secs: f32,
    /// Silence between keys in seconds
    pub gap_secs: f32,
    /// Silence before the first key in seconds
    pub lead_in_secs: f32,
    /// Peak amplitude of each of the two tones (0-0.5 keeps the sum unclipped)
    pub amplitude: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            tone_secs: 0.1,
            gap_secs: 0.1,
            lead_in_secs: 0.05,
            amplitude: 0.4,
        }
    }
}

fn num_samples(duration_secs: f32, sample_rate: u32) -> usize {
    (duration_secs * sample_rate as f32).round().max(0.0) as usize
}

/// Sum of two sine waves, each at `amplitude`
pub fn generate_dual_tone(
    low_hz: f32,
    high_hz: f32,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> Vec<f32> {
    let len = num_samples(duration_secs, sample_rate);
    let w_low = 2.0 * PI * low_hz as f64 / sample_rate as f64;
    let w_high = 2.0 * PI * high_hz as f64 / sample_rate as f64;

    (0..len)
        .map(|i| {
            let n = i as f64;
            amplitude * ((w_low * n).sin() + (w_high * n).sin()) as f32
        })
        .collect()
}

/// The two nominal tones of a key
pub fn generate_key_tone(
    key: DtmfKey,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> Vec<f32> {
    let (row_hz, col_hz) = key.frequencies();
    generate_dual_tone(
        row_hz as f32,
        col_hz as f32,
        amplitude,
        duration_secs,
        sample_rate,
    )
}

pub fn silence(duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    vec![0.0; num_samples(duration_secs, sample_rate)]
}

/// Lead-in silence, then each key followed by a gap
pub fn generate_key_sequence(
    keys: &[DtmfKey],
    config: &SequenceConfig,
    sample_rate: u32,
) -> Vec<f32> {
    let mut samples = silence(config.lead_in_secs, sample_rate);
    for &key in keys {
        samples.extend(generate_key_tone(
            key,
            config.amplitude,
            config.tone_secs,
            sample_rate,
        ));
        samples.extend(silence(config.gap_secs, sample_rate));
    }
    samples
}

/// Convert normalized samples to signed integers of the given width,
/// clipping at full scale
pub fn quantize(samples: &[f32], bits_per_sample: u16) -> Vec<i32> {
    let max = (2f64.powi(bits_per_sample as i32 - 1) - 1.0) as f32;
    samples
        .iter()
        .map(|&x| (x * max).round().clamp(-max - 1.0, max) as i32)
        .collect()
}
