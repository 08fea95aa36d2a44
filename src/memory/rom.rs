//! Read-only program image

use super::check_word_aligned;
use super::InstructionMemory;
use crate::error::MemoryError;
use crate::error::MemoryErrorKind;

/// Word-addressed instruction ROM covering [base, base + 4 * len)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionRom {
    base: u32,
    words: Vec<u32>,
}

impl InstructionRom {
    pub fn new(base: u32, words: Vec<u32>) -> Self {
        Self { base, words }
    }

    /// Builds a ROM from little-endian bytes, padding a trailing partial word with zeros
    pub fn from_le_bytes(base: u32, bytes: &[u8]) -> Self {
        let words = bytes
            .chunks(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_le_bytes(word)
            })
            .collect();
        Self { base, words }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over (address, word) pairs
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.words
            .iter()
            .enumerate()
            .map(|(i, word)| (self.base.wrapping_add(4 * i as u32), *word))
    }
}

impl InstructionMemory for InstructionRom {
    fn read_word(&self, address: u32) -> Result<u32, MemoryError> {
        check_word_aligned(address)?;
        let out_of_bounds = MemoryError::AccessError {
            address,
            kind: MemoryErrorKind::OutOfBounds,
        };
        let offset = address.checked_sub(self.base).ok_or(out_of_bounds)?;
        // An unaligned base leaves no word starting at an aligned address
        if offset % 4 != 0 {
            return Err(out_of_bounds);
        }
        self.words.get((offset / 4) as usize).copied().ok_or(out_of_bounds)
    }
}
