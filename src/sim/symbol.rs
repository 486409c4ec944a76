//! Drum symbols

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DRUM_NAMES, MAX_DRUM_COUNT};

/// Errors raised for drum indices outside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("drum {index} is out of range (board has {symbol_count} drums)")]
    OutOfRange { index: usize, symbol_count: u8 },
}

/// A drum on the board, identified by its index in `[0, symbol_count)`
///
/// Deserialized values are checked against the largest board; the engine
/// still checks every submitted drum against its own board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct Symbol(u8);

impl TryFrom<u8> for Symbol {
    type Error = SymbolError;

    fn try_from(index: u8) -> Result<Self, SymbolError> {
        Self::new(usize::from(index), MAX_DRUM_COUNT)
    }
}

impl Symbol {
    /// Validate a raw drum index against the board size
    pub fn new(index: usize, symbol_count: u8) -> Result<Self, SymbolError> {
        if index < symbol_count as usize {
            Ok(Self(index as u8))
        } else {
            Err(SymbolError::OutOfRange {
                index,
                symbol_count,
            })
        }
    }

    /// Fold an arbitrary value onto the board (used by symbol sources)
    pub fn wrapping(raw: u32, symbol_count: u8) -> Self {
        let count = u32::from(symbol_count.max(1));
        Self((raw % count) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Display name for the default four drums
    pub fn name(self) -> Option<&'static str> {
        DRUM_NAMES.get(self.index()).copied()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}
