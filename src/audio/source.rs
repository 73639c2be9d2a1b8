use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::constants::MAX_BITS_PER_SAMPLE;
use crate::error::{DtmfError, Result};

/// A mono stream of signed integer samples at a known rate
///
/// Sources are exhausting: once `next_buffer` returns `None` the stream is
/// over.
pub trait SampleSource: Send {
    fn next_buffer(&mut self) -> Result<Option<Vec<i32>>>;
    fn sample_rate(&self) -> u32;
    /// Width of the integer samples; full scale is `2^(bits - 1)`
    fn bits_per_sample(&self) -> u16;
}

/// In-memory sample source, handed out in fixed-size chunks
pub struct BufferSource {
    samples: Vec<i32>,
    position: usize,
    chunk_size: usize,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl BufferSource {
    pub fn new(samples: Vec<i32>, sample_rate: u32, bits_per_sample: u16, chunk_size: usize) -> Self {
        Self {
            samples,
            position: 0,
            chunk_size: chunk_size.max(1),
            sample_rate,
            bits_per_sample,
        }
    }
}

impl SampleSource for BufferSource {
    fn next_buffer(&mut self) -> Result<Option<Vec<i32>>> {
        if self.position >= self.samples.len() {
            return Ok(None);
        }

        let end = (self.position + self.chunk_size).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(Some(chunk))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }
}

/// WAV file sample source
///
/// Integer PCM is passed through at its native width. Float PCM is
/// quantized to 16 bits. Multi-channel files are down-mixed to mono by
/// averaging each frame.
pub struct WavFileSource {
    reader: WavReader<BufReader<File>>,
    channels: u16,
    sample_format: SampleFormat,
    bits_per_sample: u16,
    chunk_size: usize,
    sample_rate: u32,
}

impl WavFileSource {
    pub fn new<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if spec.channels == 0 {
            return Err(DtmfError::UnsupportedFormat(
                "WAV file declares zero channels".to_string(),
            ));
        }
        if spec.channels > 1 {
            log::warn!(
                "{}: down-mixing {} channels to mono",
                path.as_ref().display(),
                spec.channels
            );
        }

        let bits_per_sample = match spec.sample_format {
            SampleFormat::Int if (1..=MAX_BITS_PER_SAMPLE).contains(&spec.bits_per_sample) => {
                spec.bits_per_sample
            }
            SampleFormat::Int => {
                return Err(DtmfError::UnsupportedFormat(format!(
                    "{}-bit integer samples",
                    spec.bits_per_sample
                )));
            }
            SampleFormat::Float => 16,
        };

        log::debug!(
            "{}: {} Hz, {} channel(s), {:?} {}-bit, {} frames",
            path.as_ref().display(),
            spec.sample_rate,
            spec.channels,
            spec.sample_format,
            spec.bits_per_sample,
            reader.duration()
        );

        Ok(Self {
            reader,
            channels: spec.channels,
            sample_format: spec.sample_format,
            bits_per_sample,
            chunk_size: chunk_size.max(1),
            sample_rate: spec.sample_rate,
        })
    }

    fn read_interleaved(&mut self) -> Result<Vec<i32>> {
        let wanted = self.chunk_size * self.channels as usize;
        let samples = match self.sample_format {
            SampleFormat::Int => self
                .reader
                .samples::<i32>()
                .take(wanted)
                .collect::<std::result::Result<Vec<_>, _>>()?,
            SampleFormat::Float => self
                .reader
                .samples::<f32>()
                .take(wanted)
                .map(|s| s.map(quantize_16))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };
        Ok(samples)
    }
}

fn quantize_16(x: f32) -> i32 {
    (x * 32767.0).round().clamp(-32768.0, 32767.0) as i32
}

/// Average interleaved frames down to one channel
pub fn downmix(interleaved: &[i32], channels: usize) -> Vec<i32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i64 = frame.iter().map(|&s| s as i64).sum();
            (sum / channels as i64) as i32
        })
        .collect()
}

impl SampleSource for WavFileSource {
    fn next_buffer(&mut self) -> Result<Option<Vec<i32>>> {
        let interleaved = self.read_interleaved()?;
        if interleaved.is_empty() {
            return Ok(None);
        }
        Ok(Some(downmix(&interleaved, self.channels as usize)))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_source_chunks() {
        let mut source = BufferSource::new((0..10).collect(), 8000, 16, 4);
        assert_eq!(source.next_buffer().unwrap(), Some(vec![0, 1, 2, 3]));
        assert_eq!(source.next_buffer().unwrap(), Some(vec![4, 5, 6, 7]));
        assert_eq!(source.next_buffer().unwrap(), Some(vec![8, 9]));
        assert_eq!(source.next_buffer().unwrap(), None);
    }

    #[test]
    fn test_downmix_averages_frames() {
        assert_eq!(downmix(&[100, 200, -50, 50, 7], 2), vec![150, 0]);
        assert_eq!(downmix(&[1, 2, 3], 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize_16(0.5), 16384);
        assert_eq!(quantize_16(2.0), 32767);
        assert_eq!(quantize_16(-2.0), -32768);
    }
}
