use std::ops::Index;

use crate::constants::NUM_LINES;

/// Averaged rectified energy of the eight DTMF lines over one window
///
/// Indices 0-3 are rows, 4-7 columns.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneEnergies([f64; NUM_LINES]);

impl ToneEnergies {
    pub fn new(lines: [f64; NUM_LINES]) -> Self {
        Self(lines)
    }

    pub fn rows(&self) -> &[f64] {
        &self.0[..4]
    }

    pub fn columns(&self) -> &[f64] {
        &self.0[4..]
    }

    /// Mean energy across all eight lines
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / NUM_LINES as f64
    }

    pub fn as_array(&self) -> &[f64; NUM_LINES] {
        &self.0
    }
}

impl Index<usize> for ToneEnergies {
    type Output = f64;

    fn index(&self, line: usize) -> &f64 {
        &self.0[line]
    }
}

/// Rectify-and-average energy estimator
///
/// Folds the absolute value of each filter output into a per-line running
/// sum. Every `window_len` samples the sums are divided by the window length
/// and emitted as a [`ToneEnergies`], then cleared. This stands in for an
/// RMS measurement; only the ordering between lines matters downstream.
pub struct ToneEnergyAccumulator {
    sums: [f64; NUM_LINES],
    count: usize,
    window_len: usize,
}

impl ToneEnergyAccumulator {
    /// Create an accumulator
    ///
    /// # Arguments
    /// * `window_len` - Samples per averaging window (must be non-zero)
    pub fn new(window_len: usize) -> Self {
        debug_assert!(window_len > 0);
        Self {
            sums: [0.0; NUM_LINES],
            count: 0,
            window_len,
        }
    }

    /// Fold in one filtered sample per line
    ///
    /// Returns the window energies when this sample completes a window.
    pub fn accumulate(&mut self, outputs: &[f64; NUM_LINES]) -> Option<ToneEnergies> {
        for (sum, y) in self.sums.iter_mut().zip(outputs) {
            *sum += y.abs();
        }
        self.count += 1;

        if self.count < self.window_len {
            return None;
        }

        let len = self.window_len as f64;
        let energies = ToneEnergies(self.sums.map(|s| s / len));
        self.reset();
        Some(energies)
    }

    /// Samples folded into the current window so far
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Discard the partially filled window
    pub fn reset(&mut self) {
        self.sums = [0.0; NUM_LINES];
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run_window(acc: &mut ToneEnergyAccumulator, scale: f64) -> ToneEnergies {
        let mut result = None;
        for i in 0..acc.window_len() {
            let x = (i as f64 * 0.3).sin() * scale;
            let outputs = [x, -x, 2.0 * x, 0.5 * x, -x, x, 0.0, 3.0 * x];
            result = acc.accumulate(&outputs);
        }
        result.expect("window should complete")
    }

    #[test]
    fn test_emits_once_per_window() {
        let mut acc = ToneEnergyAccumulator::new(4);
        let ones = [1.0; NUM_LINES];
        assert!(acc.accumulate(&ones).is_none());
        assert!(acc.accumulate(&ones).is_none());
        assert!(acc.accumulate(&ones).is_none());
        assert_eq!(acc.count(), 3);
        let energies = acc.accumulate(&ones).unwrap();
        assert_eq!(energies, ToneEnergies::new([1.0; NUM_LINES]));
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_rectifies_before_averaging() {
        let mut acc = ToneEnergyAccumulator::new(2);
        acc.accumulate(&[1.0, -1.0, 2.0, -2.0, 0.0, 0.0, 0.0, 0.0]);
        let e = acc
            .accumulate(&[-1.0, 1.0, -2.0, 2.0, 0.0, 0.0, 0.0, 4.0])
            .unwrap();
        assert_eq!(e.rows(), &[1.0, 1.0, 2.0, 2.0]);
        assert_eq!(e.columns(), &[0.0, 0.0, 0.0, 2.0]);
        assert_eq!(e.mean(), 8.0 / 8.0);
    }

    #[test]
    fn test_zero_input_zero_energy() {
        let mut acc = ToneEnergyAccumulator::new(16);
        let energies = run_window(&mut acc, 0.0);
        assert!(energies.as_array().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_energy_scales_linearly() {
        let mut acc = ToneEnergyAccumulator::new(32);
        let unit = run_window(&mut acc, 1.0);
        for k in [2.0, 3.0, 10.0] {
            let scaled = run_window(&mut acc, k);
            for line in 0..NUM_LINES {
                assert_relative_eq!(scaled[line], k * unit[line], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_reset_discards_partial_window() {
        let mut acc = ToneEnergyAccumulator::new(3);
        acc.accumulate(&[5.0; NUM_LINES]);
        acc.reset();
        acc.accumulate(&[1.0; NUM_LINES]);
        acc.accumulate(&[1.0; NUM_LINES]);
        let e = acc.accumulate(&[1.0; NUM_LINES]).unwrap();
        assert_eq!(e[0], 1.0);
    }
}
