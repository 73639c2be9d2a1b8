use crate::config::StreamParams;
use crate::constants::{COLUMN_FREQUENCIES_HZ, NUM_LINES, ROW_FREQUENCIES_HZ};
use crate::error::{DtmfError, Result};
use crate::signal_processing::waveform::{generate_sine, mix_arrays};
use crate::signal_processing::StreamingFirFilter;

/// Design matched-filter taps for a single tone
///
/// Synthesizes three zero-phase sine waves of `num_taps` samples at the
/// target frequency and at `frequency * (1 ± side_tolerance)`, then mixes
/// them. The side bands widen the passband so small frequency or sample-rate
/// errors still correlate; `num_taps` sets how narrow the result is.
///
/// # Errors
/// Returns `DtmfError::FilterDesign` if the upper side band reaches Nyquist
/// or the requested length is zero
pub fn design_tone_taps(
    frequency_hz: f64,
    amplitude: f64,
    side_tolerance: f64,
    sample_rate: u32,
    num_taps: usize,
) -> Result<Vec<f64>> {
    if num_taps == 0 {
        return Err(DtmfError::FilterDesign("zero-length tone filter".to_string()));
    }

    let lower_hz = frequency_hz * (1.0 - side_tolerance);
    let upper_hz = frequency_hz * (1.0 + side_tolerance);
    let nyquist = sample_rate as f64 / 2.0;
    if lower_hz <= 0.0 || upper_hz >= nyquist {
        return Err(DtmfError::FilterDesign(format!(
            "tone band {:.1}-{:.1} Hz does not fit below Nyquist ({:.1} Hz)",
            lower_hz, upper_hz, nyquist
        )));
    }

    let center = generate_sine(frequency_hz, amplitude, 0.0, sample_rate, num_taps);
    let lower = generate_sine(lower_hz, amplitude, 0.0, sample_rate, num_taps);
    let upper = generate_sine(upper_hz, amplitude, 0.0, sample_rate, num_taps);

    Ok(mix_arrays(&[&center, &lower, &upper]))
}

/// The eight DTMF line filters driven in lock-step
///
/// Lines 0-3 are the rows (697-941 Hz) and lines 4-7 the columns
/// (1209-1633 Hz). Every filter has the same length, so they prime on the
/// same sample.
pub struct ToneFilterBank {
    filters: [StreamingFirFilter; NUM_LINES],
}

impl ToneFilterBank {
    /// Build one filter per DTMF frequency
    ///
    /// # Arguments
    /// * `params` - Derived stream parameters (rate, length, tolerance)
    /// * `full_scale` - Input normalization divisor
    pub fn new(params: &StreamParams, full_scale: f64) -> Result<Self> {
        let make = |frequency_hz: f64| -> Result<StreamingFirFilter> {
            let taps = design_tone_taps(
                frequency_hz,
                params.tap_amplitude,
                params.side_tolerance,
                params.sample_rate,
                params.filter_length,
            )?;
            StreamingFirFilter::new(taps, full_scale)
        };

        let [r1, r2, r3, r4] = ROW_FREQUENCIES_HZ;
        let [c1, c2, c3, c4] = COLUMN_FREQUENCIES_HZ;

        Ok(Self {
            filters: [
                make(r1)?,
                make(r2)?,
                make(r3)?,
                make(r4)?,
                make(c1)?,
                make(c2)?,
                make(c3)?,
                make(c4)?,
            ],
        })
    }

    /// Push one sample into every filter
    pub fn push(&mut self, sample: f64) -> Result<()> {
        for filter in &mut self.filters {
            filter.push(sample)?;
        }
        Ok(())
    }

    /// Pull one output from every filter, or `None` while starved
    pub fn pull(&mut self) -> Option<[f64; NUM_LINES]> {
        if !self.is_primed() {
            return None;
        }
        let mut outputs = [0.0; NUM_LINES];
        for (out, filter) in outputs.iter_mut().zip(self.filters.iter_mut()) {
            *out = filter.pull()?;
        }
        Some(outputs)
    }

    pub fn is_primed(&self) -> bool {
        self.filters.iter().all(StreamingFirFilter::is_primed)
    }

    /// Taps per filter
    pub fn tap_count(&self) -> usize {
        self.filters[0].num_taps()
    }

    pub fn filters(&self) -> &[StreamingFirFilter; NUM_LINES] {
        &self.filters
    }

    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
