//! Utility functions for preparing memories for execution

use std::path::Path;

use tracing::debug;
use tracing::info;

use crate::elf_helper::parse_elf_file;
use crate::elf_helper::ElfImage;
use crate::error::ElfError;
use crate::error::SimulatorError;
use crate::error::SimulatorResult;
use crate::memory::mmu::MMU;
use crate::memory::rom::InstructionRom;

/// Largest executable segment turned into an instruction ROM
pub const MAX_ROM_BYTES: u32 = 16 << 20;

/// Program image split into instruction ROM and data memory
#[derive(Clone, Debug)]
pub struct LoadedProgram {
    /// Program entry
    pub entry: u32,
    pub rom: InstructionRom,
    pub data: MMU,
}

impl LoadedProgram {
    /// Maps a zeroed RAM window into data memory
    pub fn with_ram(mut self, ram_base: u32, ram_size: u32) -> Self {
        let pages = self.data.allocate_range(ram_base, ram_size);
        debug!(
            "mapped RAM [{:#010x}, +{:#x}) ({} new pages)",
            ram_base, ram_size, pages
        );
        self
    }
}

/// Loads an ELF file.
/// Every PT_LOAD segment goes to data memory; the executable
/// segment holding the entry point also becomes the ROM
pub fn load_elf(path: &Path) -> SimulatorResult<LoadedProgram> {
    let image = parse_elf_file(path)?;
    let program = load_elf_image(&image)?;
    info!(
        "loaded ELF {} (entry {:#010x}, {} instruction words)",
        path.display(),
        program.entry,
        program.rom.len()
    );
    Ok(program)
}

/// Loads an already parsed ELF image
pub fn load_elf_image(image: &ElfImage) -> SimulatorResult<LoadedProgram> {
    let mut data = MMU::make();
    let mut rom = None;

    for segment in &image.segments {
        debug!(
            "segment {:#010x}: memsz {:#x}, filesz {:#x}, exec {}",
            segment.vaddr,
            segment.memsz,
            segment.bytes.len(),
            segment.executable
        );

        let holds_entry = image.entry >= segment.vaddr
            && image.entry - segment.vaddr < segment.memsz;
        if segment.executable && holds_entry {
            if segment.vaddr % 4 != 0 {
                return Err(ElfError::InvalidFormat(format!(
                    "executable segment at {:#010x} is not word aligned",
                    segment.vaddr
                ))
                .into());
            }
            if segment.memsz > MAX_ROM_BYTES {
                return Err(ElfError::InvalidFormat(format!(
                    "executable segment of {:#x} bytes exceeds the {:#x} byte limit",
                    segment.memsz, MAX_ROM_BYTES
                ))
                .into());
            }
            let mut bytes = segment.bytes.clone();
            bytes.resize(segment.memsz as usize, 0);
            rom = Some(InstructionRom::from_le_bytes(segment.vaddr, &bytes));
        }

        data.allocate_range(segment.vaddr, segment.memsz);
        data.write_bytes(segment.vaddr, &segment.bytes)?;
    }

    let rom = rom.ok_or_else(|| {
        ElfError::InvalidFormat(format!(
            "no executable segment contains the entry point {:#010x}",
            image.entry
        ))
    })?;

    Ok(LoadedProgram {
        entry: image.entry,
        rom,
        data,
    })
}

/// Loads a flat little-endian binary of instruction words at `base`
pub fn load_raw(path: &Path, base: u32) -> SimulatorResult<LoadedProgram> {
    if base % 4 != 0 {
        return Err(SimulatorError::ConfigError(format!(
            "raw image base {:#010x} is not word aligned",
            base
        )));
    }
    let bytes = std::fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(SimulatorError::ConfigError(format!(
            "raw image {} is {} bytes, not a whole number of words",
            path.display(),
            bytes.len()
        )));
    }
    let program = LoadedProgram {
        entry: base,
        rom: InstructionRom::from_le_bytes(base, &bytes),
        data: MMU::make(),
    };
    info!(
        "loaded raw image {} at {:#010x} ({} instruction words)",
        path.display(),
        base,
        program.rom.len()
    );
    Ok(program)
}

/// Builds a program from instruction words in memory
pub fn load_words(words: &[u32], base: u32) -> LoadedProgram {
    LoadedProgram {
        entry: base,
        rom: InstructionRom::new(base, words.to_vec()),
        data: MMU::make(),
    }
}
