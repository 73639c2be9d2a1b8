use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::constants::{COLUMN_FREQUENCIES_HZ, KEYPAD, ROW_FREQUENCIES_HZ};

/// One of the sixteen DTMF keys, identified by its keypad position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DtmfKey {
    row: u8,
    column: u8,
}

impl DtmfKey {
    /// All keys in keypad order (row-major)
    pub const ALL: [DtmfKey; 16] = {
        let mut keys = [DtmfKey { row: 0, column: 0 }; 16];
        let mut i = 0;
        while i < 16 {
            keys[i] = DtmfKey {
                row: (i / 4) as u8,
                column: (i % 4) as u8,
            };
            i += 1;
        }
        keys
    };

    /// Key at a keypad position, or `None` if either index is out of range
    pub fn from_position(row: usize, column: usize) -> Option<Self> {
        (row < 4 && column < 4).then_some(Self {
            row: row as u8,
            column: column as u8,
        })
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn column(&self) -> usize {
        self.column as usize
    }

    pub fn as_char(&self) -> char {
        KEYPAD[self.row()][self.column()]
    }

    /// Nominal (row, column) frequencies in Hz
    pub fn frequencies(&self) -> (f64, f64) {
        (
            ROW_FREQUENCIES_HZ[self.row()],
            COLUMN_FREQUENCIES_HZ[self.column()],
        )
    }
}

impl fmt::Display for DtmfKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for DtmfKey {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let c = c.to_ascii_uppercase();
        KEYPAD
            .iter()
            .enumerate()
            .find_map(|(row, keys)| {
                keys.iter()
                    .position(|&k| k == c)
                    .and_then(|column| Self::from_position(row, column))
            })
            .ok_or_else(|| format!("not a DTMF key: {:?}", c))
    }
}

impl FromStr for DtmfKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(format!("expected a single DTMF key, got {:?}", s)),
        }
    }
}

impl Serialize for DtmfKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

/// Parse a string of keys such as `"123#"`, ignoring whitespace
pub fn parse_keys(s: &str) -> Result<Vec<DtmfKey>, String> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(DtmfKey::try_from)
        .collect()
}
