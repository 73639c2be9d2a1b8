use crate::error::{DtmfError, Result};

/// Streaming FIR filter with an explicit push/pull interface
///
/// Holds its own tap coefficients and a delay line of the `N` most recent
/// input samples. The delay line behaves as a bounded FIFO of depth `N`:
/// `push` appends a sample and fails once `N` samples are waiting, `pull`
/// convolves the full window with the taps and retires the oldest sample.
/// Driven in lock-step (one push, one pull) the filter yields one output per
/// input once the first `N` samples have arrived.
///
/// Samples are divided by `full_scale` on entry so that taps and samples
/// share the `[-1, 1]` amplitude range.
pub struct StreamingFirFilter {
    taps: Vec<f64>,
    delay_line: Vec<f64>,
    /// Index of the oldest retained sample
    head: usize,
    held: usize,
    full_scale: f64,
    output: Option<f64>,
}

impl StreamingFirFilter {
    /// Create a filter from tap coefficients
    ///
    /// # Arguments
    /// * `taps` - Tap coefficients; `taps[0]` multiplies the oldest sample
    /// * `full_scale` - Divisor applied to every input sample (32768 for 16-bit PCM)
    ///
    /// # Errors
    /// Returns `DtmfError::FilterDesign` for an empty tap set or a
    /// non-positive full scale
    pub fn new(taps: Vec<f64>, full_scale: f64) -> Result<Self> {
        if taps.is_empty() {
            return Err(DtmfError::FilterDesign("empty tap set".to_string()));
        }
        if !full_scale.is_finite() || full_scale <= 0.0 {
            return Err(DtmfError::FilterDesign(format!(
                "full scale must be positive, got {}",
                full_scale
            )));
        }

        Ok(Self {
            delay_line: vec![0.0; taps.len()],
            taps,
            head: 0,
            held: 0,
            full_scale,
            output: None,
        })
    }

    /// Queue one input sample
    ///
    /// # Errors
    /// Returns `DtmfError::FilterOverrun` if `N` samples are already waiting
    /// for a `pull`. This is a caller contract violation.
    pub fn push(&mut self, sample: f64) -> Result<()> {
        let n = self.taps.len();
        if self.held == n {
            return Err(DtmfError::FilterOverrun { taps: n });
        }

        let mut slot = self.head + self.held;
        if slot >= n {
            slot -= n;
        }
        self.delay_line[slot] = sample / self.full_scale;
        self.held += 1;
        Ok(())
    }

    /// Produce the next output sample
    ///
    /// Returns `None` until the window is full. Otherwise computes the dot
    /// product of taps and window, caches it, and retires the oldest sample.
    pub fn pull(&mut self) -> Option<f64> {
        let n = self.taps.len();
        if self.held < n {
            return None;
        }

        // Oldest sample sits at `head`; walk the ring in two contiguous
        // ranges to keep modulo arithmetic out of the inner loop.
        let (wrapped, tail) = self.delay_line.split_at(self.head);
        let (taps_tail, taps_wrapped) = self.taps.split_at(tail.len());
        let output = taps_tail
            .iter()
            .zip(tail)
            .chain(taps_wrapped.iter().zip(wrapped))
            .map(|(t, x)| t * x)
            .sum::<f64>();

        self.head += 1;
        if self.head == n {
            self.head = 0;
        }
        self.held -= 1;
        self.output = Some(output);
        Some(output)
    }

    /// Most recently computed output, without advancing
    pub fn peek(&self) -> Option<f64> {
        self.output
    }

    /// Push one sample and pull one output
    pub fn process(&mut self, sample: f64) -> Result<Option<f64>> {
        self.push(sample)?;
        Ok(self.pull())
    }

    /// True once a `pull` would produce an output
    pub fn is_primed(&self) -> bool {
        self.held == self.taps.len()
    }

    /// Number of samples currently held in the window
    pub fn held(&self) -> usize {
        self.held
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Get access to the tap coefficients
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Drop all held samples and the cached output
    pub fn reset(&mut self) {
        self.delay_line.fill(0.0);
        self.head = 0;
        self.held = 0;
        self.output = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_not_primed_until_full() {
        let mut filter = StreamingFirFilter::new(vec![1.0, 1.0, 1.0], 1.0).unwrap();

        assert_eq!(filter.process(1.0).unwrap(), None);
        assert_eq!(filter.process(2.0).unwrap(), None);
        assert_eq!(filter.peek(), None);
        assert_eq!(filter.process(3.0).unwrap(), Some(6.0));
        assert_eq!(filter.peek(), Some(6.0));
    }

    #[test]
    fn test_first_tap_pairs_with_oldest_sample() {
        let mut filter = StreamingFirFilter::new(vec![1.0, 10.0, 100.0], 1.0).unwrap();

        filter.push(1.0).unwrap();
        filter.push(2.0).unwrap();
        filter.push(3.0).unwrap();
        assert_eq!(filter.pull(), Some(1.0 + 20.0 + 300.0));

        // Window is now [2, 3, 4]
        filter.push(4.0).unwrap();
        assert_eq!(filter.pull(), Some(2.0 + 30.0 + 400.0));

        // And [3, 4, 5] after the ring wraps
        filter.push(5.0).unwrap();
        assert_eq!(filter.pull(), Some(3.0 + 40.0 + 500.0));
    }

    #[test]
    fn test_push_rejected_when_full() {
        let mut filter = StreamingFirFilter::new(vec![0.5, 0.5], 1.0).unwrap();

        filter.push(1.0).unwrap();
        filter.push(1.0).unwrap();
        assert!(matches!(
            filter.push(1.0),
            Err(DtmfError::FilterOverrun { taps: 2 })
        ));

        assert_eq!(filter.held(), 2);
        assert!(filter.pull().is_some());
        assert_eq!(filter.held(), 1);
        assert!(filter.push(1.0).is_ok());
    }

    #[test]
    fn test_pull_on_starved_filter_keeps_state() {
        let mut filter = StreamingFirFilter::new(vec![1.0; 4], 1.0).unwrap();
        filter.push(1.0).unwrap();
        assert_eq!(filter.pull(), None);
        assert_eq!(filter.held(), 1);
    }

    #[test]
    fn test_input_normalized_by_full_scale() {
        let mut filter = StreamingFirFilter::new(vec![1.0], 32768.0).unwrap();
        assert_eq!(filter.process(16384.0).unwrap(), Some(0.5));
        assert_eq!(filter.process(-32768.0).unwrap(), Some(-1.0));
    }

    #[test]
    fn test_linearity() {
        let taps: Vec<f64> = (0..17).map(|i| ((i as f64) * 0.37).sin()).collect();
        let a: Vec<f64> = (0..200).map(|i| ((i * 7919) % 2001) as f64 - 1000.0).collect();
        let b: Vec<f64> = (0..200).map(|i| (i as f64 * 0.21).cos() * 3000.0).collect();

        let mut fa = StreamingFirFilter::new(taps.clone(), 32768.0).unwrap();
        let mut fb = StreamingFirFilter::new(taps.clone(), 32768.0).unwrap();
        let mut fsum = StreamingFirFilter::new(taps, 32768.0).unwrap();

        let mut compared = 0;
        for (&x, &y) in a.iter().zip(b.iter()) {
            let ya = fa.process(x).unwrap();
            let yb = fb.process(y).unwrap();
            let ys = fsum.process(x + y).unwrap();
            if let (Some(ya), Some(yb), Some(ys)) = (ya, yb, ys) {
                assert_abs_diff_eq!(ys, ya + yb, epsilon = 1e-9);
                compared += 1;
            }
        }
        assert_eq!(compared, 200 - 16);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = StreamingFirFilter::new(vec![1.0, 1.0], 1.0).unwrap();
        filter.process(1.0).unwrap();
        filter.process(1.0).unwrap();
        filter.reset();
        assert_eq!(filter.held(), 0);
        assert_eq!(filter.peek(), None);
        assert!(!filter.is_primed());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(StreamingFirFilter::new(Vec::new(), 1.0).is_err());
        assert!(StreamingFirFilter::new(vec![1.0], 0.0).is_err());
    }
}
