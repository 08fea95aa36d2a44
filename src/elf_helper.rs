//! Helper functions for parsing ELF files

use std::path::Path;

use object::elf;
use object::read::elf::FileHeader;
use object::read::elf::ProgramHeader;

use crate::error::ElfError;

pub type ELFReaderType = elf::FileHeader32<object::Endianness>;
pub type Segment = elf::ProgramHeader32<object::Endianness>;

/// A loadable segment with its contents resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadSegment {
    pub vaddr: u32,
    pub memsz: u32,
    pub executable: bool,
    /// File-backed bytes; the rest of `memsz` is zero-filled
    pub bytes: Vec<u8>,
}

/// Parsed view of an rv32 ELF image
#[derive(Clone, Debug)]
pub struct ElfImage {
    pub entry: u32,
    pub segments: Vec<LoadSegment>,
}

/// Parses an ELF file from disk
pub fn parse_elf_file(file_path: &Path) -> Result<ElfImage, ElfError> {
    let data = std::fs::read(file_path)
        .map_err(|e| ElfError::FileReadError(file_path.to_path_buf(), e))?;
    parse_elf_bytes(file_path, &data)
}

/// Parses ELF bytes; `origin` only labels errors
pub fn parse_elf_bytes(origin: &Path, data: &[u8]) -> Result<ElfImage, ElfError> {
    let parse_error =
        |e: object::read::Error| ElfError::ParseError(origin.to_path_buf(), e.to_string());

    let elf_reader = ELFReaderType::parse(data).map_err(parse_error)?;
    let endian = elf_reader.endian().map_err(parse_error)?;

    let machine = elf_reader.e_machine(endian);
    if machine != elf::EM_RISCV {
        return Err(ElfError::InvalidMachine(machine));
    }

    let mut segments = Vec::new();
    for segment in elf_reader.program_headers(endian, data).map_err(parse_error)? {
        if segment.p_type(endian) != elf::PT_LOAD {
            continue;
        }
        segments.push(resolve_segment(segment, endian, data)?);
    }

    Ok(ElfImage {
        entry: elf_reader.e_entry(endian),
        segments,
    })
}

fn resolve_segment(
    segment: &Segment,
    endian: object::Endianness,
    data: &[u8],
) -> Result<LoadSegment, ElfError> {
    let vaddr = segment.p_vaddr(endian);
    let memsz = segment.p_memsz(endian);
    let filesz = segment.p_filesz(endian);
    let offset = segment.p_offset(endian);

    // Can't handle with 32b memory
    if vaddr.checked_add(memsz).is_none() {
        return Err(ElfError::AddressOutOfBounds(vaddr));
    }
    if filesz > memsz {
        return Err(ElfError::InvalidFormat(format!(
            "segment at {:#010x} has filesz {:#x} > memsz {:#x}",
            vaddr, filesz, memsz
        )));
    }

    let start = offset as usize;
    let bytes = data
        .get(start..start + filesz as usize)
        .ok_or_else(|| {
            ElfError::InvalidFormat(format!(
                "segment at {:#010x} extends past end of file",
                vaddr
            ))
        })?
        .to_vec();

    Ok(LoadSegment {
        vaddr,
        memsz,
        executable: segment.p_flags(endian) & elf::PF_X != 0,
        bytes,
    })
}
