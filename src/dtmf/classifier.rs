use crate::config::StreamParams;
use crate::constants::NUM_LINES;
use crate::dtmf::DtmfKey;
use crate::signal_processing::ToneEnergies;

/// Debounced DTMF classifier
///
/// Consumes one [`ToneEnergies`] per averaging window. A line "hits" when its
/// energy exceeds the window mean; each line counts its consecutive hits and
/// drops back to zero on a miss. A key is reported when exactly one row and
/// one column hit and both counters are exactly at the duration threshold.
///
/// Reporting on equality makes this an edge trigger: counters keep climbing
/// while a key is held, so a long press is reported once. Two presses of
/// the same key are only reported separately if the energy drops in between.
pub struct DtmfClassifier {
    counters: [u32; NUM_LINES],
    duration_threshold: u32,
    power_threshold: f64,
}

impl DtmfClassifier {
    /// Create a classifier
    ///
    /// # Arguments
    /// * `duration_threshold` - Consecutive winning windows before a key is reported
    /// * `power_threshold` - Mean energy below which a window counts as silence
    pub fn new(duration_threshold: u32, power_threshold: f64) -> Self {
        Self {
            counters: [0; NUM_LINES],
            duration_threshold,
            power_threshold,
        }
    }

    pub fn from_params(params: &StreamParams) -> Self {
        Self::new(params.duration_threshold, params.power_threshold)
    }

    /// Classify one window, returning the key if one fires on this window
    pub fn classify(&mut self, energies: &ToneEnergies) -> Option<DtmfKey> {
        let mean = energies.mean();

        if mean < self.power_threshold {
            self.reset();
            return None;
        }

        let mut row = None;
        let mut row_hits = 0;
        let mut column = None;
        let mut column_hits = 0;

        for (line, counter) in self.counters.iter_mut().enumerate() {
            if energies[line] > mean {
                *counter = counter.saturating_add(1);
                if line < 4 {
                    row = Some(line);
                    row_hits += 1;
                } else {
                    column = Some(line - 4);
                    column_hits += 1;
                }
            } else {
                *counter = 0;
            }
        }

        let (Some(row), Some(column)) = (row, column) else {
            self.reset();
            return None;
        };
        if row_hits != 1 || column_hits != 1 {
            self.reset();
            return None;
        }

        let fired = self.counters[row] == self.duration_threshold
            && self.counters[4 + column] == self.duration_threshold;

        if fired {
            DtmfKey::from_position(row, column)
        } else {
            None
        }
    }

    /// Consecutive-hit counters, rows first
    pub fn counters(&self) -> &[u32; NUM_LINES] {
        &self.counters
    }

    pub fn duration_threshold(&self) -> u32 {
        self.duration_threshold
    }

    pub fn reset(&mut self) {
        self.counters = [0; NUM_LINES];
    }
}
