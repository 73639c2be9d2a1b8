use std::path::Path;

use hound::{WavSpec, WavWriter};

/// Write normalized mono samples as 16-bit PCM, clipping anything outside
/// `[-1, 1]`
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        let pcm = (sample * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(pcm)?;
    }

    writer.finalize()?;
    Ok(())
}
