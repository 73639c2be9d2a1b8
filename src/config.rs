//! Configuration for the touchtone decoder.
//!
//! [`DecoderConfig`] holds the tunables in user-facing units. Once the sample
//! rate of a stream is known, [`DecoderConfig::stream_params`] validates them
//! and derives the sample-domain quantities the pipeline runs on.
//!
//! ## Loading from TOML
//!
//! Every field is optional in the file; missing fields keep their defaults:
//!
//! ```toml
//! min_tone_duration_ms = 40
//! accumulator_duration_ms = 10
//! power_threshold = 0.05
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACCUMULATOR_DURATION_MS, DEFAULT_AMPLITUDE_TOLERANCE, DEFAULT_FILTER_LENGTH_SCALE,
    DEFAULT_MIN_TONE_DURATION_MS, DEFAULT_POWER_THRESHOLD, DEFAULT_SIDE_TOLERANCE_RATIO,
    DEFAULT_TAP_AMPLITUDE,
};
use crate::error::{DtmfError, Result};

/// A whole number of milliseconds
///
/// # Parsing formats
/// - `24` - milliseconds (no suffix)
/// - `24ms` - milliseconds (explicit)
/// - `0.024s` - seconds, must land on a whole millisecond
///
/// # Example
/// ```
/// use touchtone::config::DurationMs;
///
/// let d: DurationMs = "0.04s".parse().unwrap();
/// assert_eq!(d.as_ms(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationMs(u32);

impl DurationMs {
    pub fn from_ms(ms: u32) -> Self {
        Self(ms)
    }

    pub fn as_ms(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DurationMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl FromStr for DurationMs {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s.strip_suffix("ms") {
            let ms: u32 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid duration: {}", s))?;
            return Ok(Self(ms));
        }

        if let Some(num) = s.strip_suffix('s') {
            let secs: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid duration: {}", s))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err("duration must be non-negative".to_string());
            }
            let ms = secs * 1000.0;
            if (ms - ms.round()).abs() > 1e-6 {
                return Err(format!("duration must be a whole number of milliseconds: {}", s));
            }
            return Ok(Self(ms.round() as u32));
        }

        let ms: u32 = s.parse().map_err(|_| format!("invalid duration: {}", s))?;
        Ok(Self(ms))
    }
}

/// Decoder tunables
///
/// The defaults reproduce the reference decoder: 24 ms minimum tone, 8 ms
/// averaging window (so a key must win three windows in a row), and taps
/// twice as long as the averaging window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Minimum duration of a valid key-press in milliseconds
    pub min_tone_duration_ms: u32,
    /// Averaging window in milliseconds; must divide `min_tone_duration_ms`
    pub accumulator_duration_ms: u32,
    /// Silence floor on the mean averaged rectified energy (unitless)
    pub power_threshold: f64,
    /// Allowed frequency deviation as a fraction (0.035 = 3.5%)
    pub amplitude_tolerance: f64,
    /// Fraction of `amplitude_tolerance` used to place the side-band taps
    pub side_tolerance_ratio: f64,
    /// Peak amplitude of the sine waves the taps are built from
    pub tap_amplitude: f64,
    /// Filter length as a multiple of the averaging window
    pub filter_length_scale: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            min_tone_duration_ms: DEFAULT_MIN_TONE_DURATION_MS,
            accumulator_duration_ms: DEFAULT_ACCUMULATOR_DURATION_MS,
            power_threshold: DEFAULT_POWER_THRESHOLD,
            amplitude_tolerance: DEFAULT_AMPLITUDE_TOLERANCE,
            side_tolerance_ratio: DEFAULT_SIDE_TOLERANCE_RATIO,
            tap_amplitude: DEFAULT_TAP_AMPLITUDE,
            filter_length_scale: DEFAULT_FILTER_LENGTH_SCALE,
        }
    }
}

/// Sample-domain parameters derived from a [`DecoderConfig`] and a sample rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamParams {
    /// Stream sample rate in Hz
    pub sample_rate: u32,
    /// Samples per averaging window
    pub window_samples: usize,
    /// Number of taps in every tone filter
    pub filter_length: usize,
    /// Consecutive winning windows required before a key is emitted
    pub duration_threshold: u32,
    /// Relative offset of the side-band sine waves
    pub side_tolerance: f64,
    /// Silence floor on the mean window energy
    pub power_threshold: f64,
    /// Peak amplitude of the tap sine waves
    pub tap_amplitude: f64,
}

impl DecoderConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Ratio of minimum tone duration to averaging window
    pub fn duration_threshold(&self) -> Result<u32> {
        if self.accumulator_duration_ms == 0 {
            return Err(DtmfError::Config(
                "accumulator duration must be positive".to_string(),
            ));
        }
        if self.min_tone_duration_ms < self.accumulator_duration_ms
            || !self
                .min_tone_duration_ms
                .is_multiple_of(self.accumulator_duration_ms)
        {
            return Err(DtmfError::Config(format!(
                "minimum tone duration ({} ms) must be a positive multiple of the accumulator duration ({} ms)",
                self.min_tone_duration_ms, self.accumulator_duration_ms
            )));
        }
        Ok(self.min_tone_duration_ms / self.accumulator_duration_ms)
    }

    /// Validate the configuration against a sample rate and derive the
    /// sample-domain parameters
    ///
    /// # Errors
    /// Returns `DtmfError::Config` if any tunable is out of range or the
    /// averaging window rounds down to zero samples at this rate.
    pub fn stream_params(&self, sample_rate: u32) -> Result<StreamParams> {
        if sample_rate == 0 {
            return Err(DtmfError::Config("sample rate must be positive".to_string()));
        }

        let duration_threshold = self.duration_threshold()?;

        if !self.power_threshold.is_finite() || self.power_threshold < 0.0 {
            return Err(DtmfError::Config(format!(
                "power threshold must be non-negative, got {}",
                self.power_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.amplitude_tolerance) {
            return Err(DtmfError::Config(format!(
                "amplitude tolerance must be in [0, 1), got {}",
                self.amplitude_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.side_tolerance_ratio) {
            return Err(DtmfError::Config(format!(
                "side tolerance ratio must be in [0, 1], got {}",
                self.side_tolerance_ratio
            )));
        }
        if !self.tap_amplitude.is_finite() || self.tap_amplitude <= 0.0 {
            return Err(DtmfError::Config(format!(
                "tap amplitude must be positive, got {}",
                self.tap_amplitude
            )));
        }
        if self.filter_length_scale == 0 {
            return Err(DtmfError::Config(
                "filter length scale must be at least 1".to_string(),
            ));
        }

        let window_samples =
            ((sample_rate as f64 / 1000.0) * self.accumulator_duration_ms as f64) as usize;
        if window_samples == 0 {
            return Err(DtmfError::Config(format!(
                "averaging window of {} ms is zero samples at {} Hz",
                self.accumulator_duration_ms, sample_rate
            )));
        }

        Ok(StreamParams {
            sample_rate,
            window_samples,
            filter_length: window_samples * self.filter_length_scale,
            duration_threshold,
            side_tolerance: self.amplitude_tolerance * self.side_tolerance_ratio,
            power_threshold: self.power_threshold,
            tap_amplitude: self.tap_amplitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_ms() {
        let d: DurationMs = "24".parse().unwrap();
        assert_eq!(d.as_ms(), 24);

        let d: DurationMs = "24ms".parse().unwrap();
        assert_eq!(d.as_ms(), 24);
    }

    #[test]
    fn test_duration_from_seconds() {
        let d: DurationMs = "0.008s".parse().unwrap();
        assert_eq!(d.as_ms(), 8);
    }

    #[test]
    fn test_duration_invalid() {
        assert!("abc".parse::<DurationMs>().is_err());
        assert!("-5ms".parse::<DurationMs>().is_err());
        assert!("0.0005s".parse::<DurationMs>().is_err());
    }

    #[test]
    fn test_default_stream_params_at_8khz() {
        let params = DecoderConfig::default().stream_params(8000).unwrap();
        assert_eq!(params.window_samples, 64);
        assert_eq!(params.filter_length, 128);
        assert_eq!(params.duration_threshold, 3);
        assert!((params.side_tolerance - 0.007).abs() < 1e-12);
    }

    #[test]
    fn test_window_truncates_like_reference() {
        // 11025 Hz * 8 ms = 88.2 samples
        let params = DecoderConfig::default().stream_params(11025).unwrap();
        assert_eq!(params.window_samples, 88);
        assert_eq!(params.filter_length, 176);
    }

    #[test]
    fn test_zero_sample_window_rejected() {
        let err = DecoderConfig::default().stream_params(100).unwrap_err();
        assert!(matches!(err, DtmfError::Config(_)));
    }

    #[test]
    fn test_duration_ratio_must_divide() {
        let config = DecoderConfig {
            min_tone_duration_ms: 25,
            ..DecoderConfig::default()
        };
        assert!(config.stream_params(8000).is_err());

        let config = DecoderConfig {
            min_tone_duration_ms: 4,
            ..DecoderConfig::default()
        };
        assert!(config.stream_params(8000).is_err());
    }

    #[test]
    fn test_out_of_range_tunables_rejected() {
        let bad = [
            DecoderConfig {
                power_threshold: -1.0,
                ..DecoderConfig::default()
            },
            DecoderConfig {
                amplitude_tolerance: 1.5,
                ..DecoderConfig::default()
            },
            DecoderConfig {
                tap_amplitude: 0.0,
                ..DecoderConfig::default()
            },
            DecoderConfig {
                filter_length_scale: 0,
                ..DecoderConfig::default()
            },
        ];
        for config in bad {
            assert!(config.stream_params(8000).is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_toml_partial_override() {
        let config = DecoderConfig::from_toml_str(
            "min_tone_duration_ms = 40\naccumulator_duration_ms = 10\n",
        )
        .unwrap();
        assert_eq!(config.min_tone_duration_ms, 40);
        assert_eq!(config.accumulator_duration_ms, 10);
        assert_eq!(config.power_threshold, DEFAULT_POWER_THRESHOLD);
        assert_eq!(config.duration_threshold().unwrap(), 4);
    }

    #[test]
    fn test_toml_unknown_field_rejected() {
        let err = DecoderConfig::from_toml_str("bogus = 1\n").unwrap_err();
        assert!(matches!(err, DtmfError::ConfigParse(_)));
    }
}
