//! Deterministic candidate names for parameter de-duplication
//!
//! Candidates are fixed-width base-26 numbers written with the digits `a`..`z`:
//! `aaaa, aaab, ..., aaaz, aaba, ...`. Each lookup starts a fresh sequence, so
//! two lookups against the same occupied names yield the same candidates.

use serde::{Deserialize, Serialize};

/// Separator between a parameter suffix and its generated disambiguator
pub const NAME_SEPARATOR: &str = "__";

/// Bounds on unique-name generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Candidates tried before giving up
    pub max_attempts: u32,
    /// Number of `a`..`z` digits in each candidate
    pub suffix_width: u8,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10_000,
            suffix_width: 4,
        }
    }
}

/// Iterator over `a`-padded base-26 strings of a fixed width.
#[derive(Debug, Clone)]
pub struct AlphabeticSequence {
    digits: Vec<u8>,
    exhausted: bool,
}

impl AlphabeticSequence {
    pub fn new(width: usize) -> Self {
        AlphabeticSequence {
            digits: vec![0; width.max(1)],
            exhausted: false,
        }
    }
}

impl Iterator for AlphabeticSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let current: String = self.digits.iter().map(|d| char::from(b'a' + d)).collect();

        // Increment with carry; wrapping past the most significant digit ends the sequence
        let mut position = self.digits.len();
        loop {
            if position == 0 {
                self.exhausted = true;
                break;
            }
            position -= 1;
            if self.digits[position] < 25 {
                self.digits[position] += 1;
                break;
            }
            self.digits[position] = 0;
        }

        Some(current)
    }
}
