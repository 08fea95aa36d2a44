use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Failed to load ELF file: {0}")]
    ElfLoadError(#[from] ElfError),

    #[error("CPU execution error: {0}")]
    ExecutionError(#[from] ExecutionError),

    #[error("Memory error: {0}")]
    MemoryError(#[from] MemoryError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    SnapshotError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Errors related to ELF file operations
#[derive(Error, Debug)]
pub enum ElfError {
    #[error("Failed to read ELF file '{0}': {1}")]
    FileReadError(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse ELF file '{0}': {1}")]
    ParseError(PathBuf, String),

    #[error("Invalid ELF format: {0}")]
    InvalidFormat(String),

    #[error("Memory address out of bounds: {0:#010x}")]
    AddressOutOfBounds(u32),

    #[error("Invalid ELF machine type: {0}")]
    InvalidMachine(u16),
}

/// Errors related to CPU execution, as seen by the harness
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Illegal instruction fetch at PC={0:#010x}")]
    IllegalFetch(u32),

    #[error("Data memory fault at address {0:#010x}")]
    MemoryFault(u32),

    #[error("Execution limit reached: {0} instructions")]
    ExecutionLimitReached(u64),
}

/// Errors related to memory operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Memory access error at address {address:#010x}: {kind}")]
    AccessError { address: u32, kind: MemoryErrorKind },

    #[error("Invalid memory alignment: address {0:#010x} is not aligned to {1} bytes")]
    AlignmentError(u32, u32),
}

impl MemoryError {
    /// The address that caused the error
    pub fn address(&self) -> u32 {
        match self {
            MemoryError::AccessError { address, .. } => *address,
            MemoryError::AlignmentError(address, _) => *address,
        }
    }
}

/// Specific kinds of memory errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryErrorKind {
    #[error("Attempted to read from unallocated memory")]
    ReadUnallocated,

    #[error("Attempted to write to unallocated memory")]
    WriteUnallocated,

    #[error("Attempted to access memory outside addressable range")]
    OutOfBounds,
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
