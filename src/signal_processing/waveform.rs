use std::f64::consts::PI;

/// Generate `length` samples of `amplitude * sin(2π f n / fs + phase)`
///
/// # Arguments
/// * `frequency_hz` - Tone frequency in Hz
/// * `amplitude` - Peak amplitude
/// * `phase_degrees` - Initial phase in degrees
/// * `sample_rate` - Sample rate in Hz
/// * `length` - Number of samples to generate
pub fn generate_sine(
    frequency_hz: f64,
    amplitude: f64,
    phase_degrees: f64,
    sample_rate: u32,
    length: usize,
) -> Vec<f64> {
    let omega = 2.0 * PI * frequency_hz / sample_rate as f64;
    let phase = phase_degrees.to_radians();

    (0..length)
        .map(|n| amplitude * (omega * n as f64 + phase).sin())
        .collect()
}

/// Generate a cosine, i.e. a sine advanced by 90 degrees
pub fn generate_cosine(
    frequency_hz: f64,
    amplitude: f64,
    phase_degrees: f64,
    sample_rate: u32,
    length: usize,
) -> Vec<f64> {
    generate_sine(
        frequency_hz,
        amplitude,
        phase_degrees + 90.0,
        sample_rate,
        length,
    )
}

/// Mix arrays in the audio sense: element-wise sum divided by the number of
/// inputs, so mixing equal-amplitude signals does not grow the peak.
///
/// The result is as long as the shortest input. Mixing nothing yields an
/// empty vector.
pub fn mix_arrays(inputs: &[&[f64]]) -> Vec<f64> {
    let Some(len) = inputs.iter().map(|a| a.len()).min() else {
        return Vec::new();
    };
    let count = inputs.len() as f64;

    (0..len)
        .map(|i| inputs.iter().map(|a| a[i]).sum::<f64>() / count)
        .collect()
}
