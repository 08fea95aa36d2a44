pub mod alu;
pub mod branch;
pub mod control;
pub mod cpu;
pub mod elf_helper;
pub mod flags;
pub mod instruction;
pub mod loader;
pub mod memory;
pub mod run_wrapper;
pub mod snapshot;

pub mod stages_simple;

pub mod single_cycle;

pub mod error;
