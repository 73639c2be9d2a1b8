use serde::Serialize;

use crate::audio::SampleSource;
use crate::config::{DecoderConfig, StreamParams};
use crate::constants::MAX_BITS_PER_SAMPLE;
use crate::dtmf::{DtmfClassifier, DtmfKey};
use crate::error::{DtmfError, Result};
use crate::signal_processing::{ToneEnergies, ToneEnergyAccumulator, ToneFilterBank};

/// A key-press reported by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub key: DtmfKey,
    /// Index of the input sample that closed the reporting window
    pub sample_index: u64,
    /// `sample_index` in seconds
    pub time_secs: f64,
}

/// Outcome of one averaging window
#[derive(Debug, Clone, Copy)]
pub struct WindowReport {
    /// Index of the input sample that closed the window
    pub end_sample: u64,
    pub energies: ToneEnergies,
    pub mean: f64,
    pub key: Option<DtmfKey>,
}

/// Totals for a finished stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DecodeSummary {
    pub samples: u64,
    pub windows: u64,
    pub detections: usize,
    /// Filtered samples in the trailing partial window, never classified
    pub discarded_samples: usize,
}

/// Full-scale divisor for signed integers of the given width
pub fn full_scale(bits_per_sample: u16) -> Result<f64> {
    if !(1..=MAX_BITS_PER_SAMPLE).contains(&bits_per_sample) {
        return Err(DtmfError::Config(format!(
            "unsupported sample width: {} bits",
            bits_per_sample
        )));
    }
    Ok(2f64.powi(bits_per_sample as i32 - 1))
}

/// Streaming DTMF detector for one mono stream
///
/// Each input sample is pushed through the eight tone filters, the rectified
/// outputs are folded into the energy accumulator, and every completed
/// window is classified. All state belongs to this instance; decode several
/// channels by creating one processor per channel.
pub struct DtmfProcessor {
    params: StreamParams,
    filters: ToneFilterBank,
    accumulator: ToneEnergyAccumulator,
    classifier: DtmfClassifier,
    samples_seen: u64,
    windows: u64,
    detections: usize,
}

impl DtmfProcessor {
    /// Build a processor for a stream
    ///
    /// # Errors
    /// Returns `DtmfError::Config` or `DtmfError::FilterDesign` if the
    /// configuration cannot be realised at this sample rate and width. No
    /// samples need to have been read yet.
    pub fn new(config: &DecoderConfig, sample_rate: u32, bits_per_sample: u16) -> Result<Self> {
        let params = config.stream_params(sample_rate)?;
        let filters = ToneFilterBank::new(&params, full_scale(bits_per_sample)?)?;

        log::debug!(
            "DTMF processor: {} Hz, {} taps, {}-sample windows, {} window debounce",
            params.sample_rate,
            params.filter_length,
            params.window_samples,
            params.duration_threshold
        );

        Ok(Self {
            accumulator: ToneEnergyAccumulator::new(params.window_samples),
            classifier: DtmfClassifier::from_params(&params),
            params,
            filters,
            samples_seen: 0,
            windows: 0,
            detections: 0,
        })
    }

    /// Process one sample, returning a report when it closes a window
    pub fn process_sample(&mut self, sample: i32) -> Result<Option<WindowReport>> {
        let index = self.samples_seen;
        self.samples_seen += 1;

        self.filters.push(sample as f64)?;
        let Some(outputs) = self.filters.pull() else {
            return Ok(None);
        };
        let Some(energies) = self.accumulator.accumulate(&outputs) else {
            return Ok(None);
        };

        self.windows += 1;
        let mean = energies.mean();
        let key = self.classifier.classify(&energies);

        log::trace!(
            "window {} @{}: mean {:.4} rows {:.4?} cols {:.4?}",
            self.windows,
            index,
            mean,
            energies.rows(),
            energies.columns()
        );

        if let Some(key) = key {
            self.detections += 1;
            log::info!(
                "Detected '{}' at {:.3}s",
                key,
                index as f64 / self.params.sample_rate as f64
            );
        }

        Ok(Some(WindowReport {
            end_sample: index,
            energies,
            mean,
            key,
        }))
    }

    /// Process a buffer and return every window it closed
    pub fn process_windows(&mut self, samples: &[i32]) -> Result<Vec<WindowReport>> {
        let mut reports = Vec::new();
        for &sample in samples {
            if let Some(report) = self.process_sample(sample)? {
                reports.push(report);
            }
        }
        Ok(reports)
    }

    /// Process a buffer and return the keys it produced, in order
    pub fn process_buffer(&mut self, samples: &[i32]) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();
        for &sample in samples {
            if let Some(report) = self.process_sample(sample)? {
                detections.extend(self.detection_from(&report));
            }
        }
        Ok(detections)
    }

    fn detection_from(&self, report: &WindowReport) -> Option<Detection> {
        report.key.map(|key| Detection {
            key,
            sample_index: report.end_sample,
            time_secs: report.end_sample as f64 / self.params.sample_rate as f64,
        })
    }

    /// End the stream
    ///
    /// A partially filled window is dropped rather than classified, so
    /// stopping early never reports on incomplete evidence.
    pub fn finish(self) -> DecodeSummary {
        DecodeSummary {
            samples: self.samples_seen,
            windows: self.windows,
            detections: self.detections,
            discarded_samples: self.accumulator.count(),
        }
    }

    pub fn params(&self) -> &StreamParams {
        &self.params
    }

    /// Taps per tone filter; no key can be reported before this many samples
    pub fn tap_count(&self) -> usize {
        self.filters.tap_count()
    }

    pub fn is_primed(&self) -> bool {
        self.filters.is_primed()
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}

/// Decode a whole source, calling `on_detection` as each key is reported
///
/// The processor is built from the source's rate and width before any
/// samples are read, so configuration errors surface without consuming it.
pub fn decode_source<S, F>(
    source: &mut S,
    config: &DecoderConfig,
    mut on_detection: F,
) -> Result<DecodeSummary>
where
    S: SampleSource + ?Sized,
    F: FnMut(&Detection),
{
    let mut processor = DtmfProcessor::new(config, source.sample_rate(), source.bits_per_sample())?;

    while let Some(buffer) = source.next_buffer()? {
        for detection in processor.process_buffer(&buffer)? {
            on_detection(&detection);
        }
    }

    Ok(processor.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BufferSource;

    #[test]
    fn test_full_scale() {
        assert_eq!(full_scale(16).unwrap(), 32768.0);
        assert_eq!(full_scale(8).unwrap(), 128.0);
        assert_eq!(full_scale(32).unwrap(), 2147483648.0);
        assert!(full_scale(0).is_err());
        assert!(full_scale(33).is_err());
    }

    #[test]
    fn test_config_error_before_processing() {
        let mut source = BufferSource::new(vec![0; 1000], 100, 16, 256);
        let result = decode_source(&mut source, &DecoderConfig::default(), |_| {});
        assert!(matches!(result, Err(DtmfError::Config(_))));
        // Nothing was consumed
        assert!(source.next_buffer().unwrap().is_some());
    }

    #[test]
    fn test_windows_start_after_priming() {
        let mut processor = DtmfProcessor::new(&DecoderConfig::default(), 8000, 16).unwrap();
        let taps = processor.tap_count();
        let window = processor.params().window_samples;

        let reports = processor.process_windows(&vec![0; taps + 3 * window]).unwrap();
        assert_eq!(reports.len(), 3);
        // First output at index taps - 1, window closes window - 1 samples later
        assert_eq!(reports[0].end_sample as usize, taps + window - 2);
        assert!(reports.iter().all(|r| r.mean == 0.0 && r.key.is_none()));
    }

    #[test]
    fn test_finish_discards_partial_window() {
        let mut processor = DtmfProcessor::new(&DecoderConfig::default(), 8000, 16).unwrap();
        let taps = processor.tap_count();
        let window = processor.params().window_samples;

        processor
            .process_buffer(&vec![0; taps - 1 + window + 10])
            .unwrap();
        let summary = processor.finish();
        assert_eq!(summary.windows, 1);
        assert_eq!(summary.discarded_samples, 10);
        assert_eq!(summary.detections, 0);
    }
}
