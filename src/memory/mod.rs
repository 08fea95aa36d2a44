//! Memory interfaces seen by the core

pub mod mmu;
pub mod rom;

use crate::error::MemoryError;

/// Word-addressed, read-only instruction store
pub trait InstructionMemory {
    /// Reads the instruction word at a 4-byte aligned address
    fn read_word(&self, address: u32) -> Result<u32, MemoryError>;
}

/// Byte-addressed data store with word-sized accesses
pub trait DataMemory {
    /// Reads the word at a 4-byte aligned address
    fn read_word(&self, address: u32) -> Result<u32, MemoryError>;

    /// Writes the word at a 4-byte aligned address
    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryError>;
}

/// Rejects addresses that are not 4-byte aligned
pub fn check_word_aligned(address: u32) -> Result<(), MemoryError> {
    if address % 4 != 0 {
        return Err(MemoryError::AlignmentError(address, 4));
    }
    Ok(())
}
