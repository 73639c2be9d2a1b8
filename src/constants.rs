//! DTMF frequency plan and reference decoder constants
//!
//! The frequency plan is fixed by the DTMF standard. The remaining values
//! are the defaults used by [`crate::config::DecoderConfig`].

/// Row (low group) frequencies in Hz
pub const ROW_FREQUENCIES_HZ: [f64; 4] = [697.0, 770.0, 852.0, 941.0];

/// Column (high group) frequencies in Hz
pub const COLUMN_FREQUENCIES_HZ: [f64; 4] = [1209.0, 1336.0, 1477.0, 1633.0];

/// Number of tone lines (four rows followed by four columns)
pub const NUM_LINES: usize = 8;

/// Keypad layout indexed by `[row][column]`
pub const KEYPAD: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Minimum duration of a valid key-press in milliseconds
pub const DEFAULT_MIN_TONE_DURATION_MS: u32 = 24;

/// Duration over which rectified filter output is averaged in milliseconds
pub const DEFAULT_ACCUMULATOR_DURATION_MS: u32 = 8;

/// Silence floor on the mean averaged rectified energy
pub const DEFAULT_POWER_THRESHOLD: f64 = 0.02;

/// Frequency deviation allowed for a DTMF tone (3.5%)
pub const DEFAULT_AMPLITUDE_TOLERANCE: f64 = 0.035;

/// Fraction of the tolerance used for the side-band taps
pub const DEFAULT_SIDE_TOLERANCE_RATIO: f64 = 1.0 / 5.0;

/// Peak amplitude of the sine waves the taps are built from
pub const DEFAULT_TAP_AMPLITUDE: f64 = 2.0;

/// Filter length as a multiple of the averaging window.
/// Long enough to keep rows 1 and 2 apart.
pub const DEFAULT_FILTER_LENGTH_SCALE: usize = 2;

/// Largest supported integer sample width
pub const MAX_BITS_PER_SAMPLE: u16 = 32;
