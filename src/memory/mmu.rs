//! Memory management unit implemented
//! with a two-level page table

use super::check_word_aligned;
use super::DataMemory;
use crate::error::MemoryError;
use crate::error::MemoryErrorKind;

const WORD_WIDTH: usize = 32;
const FIRST_LEVEL_WIDTH: usize = 10;
const SECOND_LEVEL_WIDTH: usize = 10;
const PAGE_WIDTH: usize = 12;

const FIRST_LEVEL_SIZE: usize = 1 << FIRST_LEVEL_WIDTH;
const SECOND_LEVEL_SIZE: usize = 1 << SECOND_LEVEL_WIDTH;
pub const PAGE_SIZE: usize = 1 << PAGE_WIDTH;

// Defines page type
type PageType = Box<[u8; PAGE_SIZE]>;

/// Memory management unit
#[derive(Clone, Debug)]
pub struct MMU {
    // Address are in u32
    // data[x][y][z] stores the byte (u8) at (x << 22) | (y << 12) | z
    // Allocate stuff lazily
    data: Vec<Option<Vec<Option<PageType>>>>,
}

impl Default for MMU {
    fn default() -> Self {
        Self::make()
    }
}

impl MMU {
    /// Make a new MMU
    pub fn make() -> Self {
        Self {
            data: vec![None; FIRST_LEVEL_SIZE],
        }
    }

    /// The first-level index of the address
    pub fn get_first_level_index(address: u32) -> usize {
        (address >> (WORD_WIDTH - FIRST_LEVEL_WIDTH)) as usize
    }
    /// The second-level index of the address
    pub fn get_second_level_index(address: u32) -> usize {
        ((address >> (WORD_WIDTH - FIRST_LEVEL_WIDTH - SECOND_LEVEL_WIDTH))
            & ((SECOND_LEVEL_SIZE - 1) as u32)) as usize
    }
    /// The page offset (third-level?)
    pub fn get_page_offset(address: u32) -> usize {
        (address & ((PAGE_SIZE - 1) as u32)) as usize
    }

    /// Check if a page is allocated at the given address
    pub fn page_exists(&self, address: u32) -> bool {
        let (i, j) = (
            Self::get_first_level_index(address),
            Self::get_second_level_index(address),
        );

        match &self.data[i] {
            Some(second_level) => second_level[j].is_some(),
            None => false,
        }
    }

    /// Allocate a page of memory at the given address.
    /// Returns true iff a new page was allocated
    pub fn allocate_page(&mut self, address: u32) -> bool {
        let (i, j) = (
            Self::get_first_level_index(address),
            Self::get_second_level_index(address),
        );

        // Allocate the second level if it doesn't exist
        let second_level =
            self.data[i].get_or_insert_with(|| vec![None; SECOND_LEVEL_SIZE]);

        if second_level[j].is_none() {
            second_level[j] = Some(Box::new([0; PAGE_SIZE]));
            true
        } else {
            false
        }
    }

    /// Allocate every page touched by [start, start + size).
    /// Returns the number of pages newly allocated
    pub fn allocate_range(&mut self, start: u32, size: u32) -> usize {
        if size == 0 {
            return 0;
        }
        let last = start.saturating_add(size - 1);
        let mut allocated = 0;
        let mut page = start & !((PAGE_SIZE - 1) as u32);
        loop {
            if self.allocate_page(page) {
                allocated += 1;
            }
            match page.checked_add(PAGE_SIZE as u32) {
                Some(next) if next <= last => page = next,
                _ => break,
            }
        }
        allocated
    }

    /// Set the byte at the given address
    pub fn set8(&mut self, address: u32, byte: u8) -> Result<(), MemoryError> {
        let (i, j, k) = (
            Self::get_first_level_index(address),
            Self::get_second_level_index(address),
            Self::get_page_offset(address),
        );

        if let Some(second_level) = &mut self.data[i] {
            if let Some(page) = &mut second_level[j] {
                page[k] = byte;
                return Ok(());
            }
        }
        Err(MemoryError::AccessError {
            address,
            kind: MemoryErrorKind::WriteUnallocated,
        })
    }

    /// Get the byte at the given address
    pub fn get8(&self, address: u32) -> Result<u8, MemoryError> {
        let (i, j, k) = (
            Self::get_first_level_index(address),
            Self::get_second_level_index(address),
            Self::get_page_offset(address),
        );

        if let Some(second_level) = &self.data[i] {
            if let Some(page) = &second_level[j] {
                return Ok(page[k]);
            }
        }
        Err(MemoryError::AccessError {
            address,
            kind: MemoryErrorKind::ReadUnallocated,
        })
    }

    /// Copy bytes starting at the given address.
    /// Pages must already be allocated
    pub fn write_bytes(
        &mut self,
        address: u32,
        bytes: &[u8],
    ) -> Result<(), MemoryError> {
        for (offset, byte) in bytes.iter().enumerate() {
            let current = address.checked_add(offset as u32).ok_or(
                MemoryError::AccessError {
                    address: address.wrapping_add(offset as u32),
                    kind: MemoryErrorKind::OutOfBounds,
                },
            )?;
            self.set8(current, *byte)?;
        }
        Ok(())
    }
}

impl DataMemory for MMU {
    fn read_word(&self, address: u32) -> Result<u32, MemoryError> {
        check_word_aligned(address)?;
        // A word never straddles pages once aligned
        let mut bytes = [0u8; 4];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.get8(address + offset as u32)?;
        }
        Ok(u32::from_le_bytes(bytes))
    }

    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        check_word_aligned(address)?;
        if !self.page_exists(address) {
            return Err(MemoryError::AccessError {
                address,
                kind: MemoryErrorKind::WriteUnallocated,
            });
        }
        for (offset, byte) in value.to_le_bytes().iter().enumerate() {
            self.set8(address + offset as u32, *byte)?;
        }
        Ok(())
    }
}
