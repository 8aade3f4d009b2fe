//! ELF object file decoding and RV32/64I base-integer instruction decoding.
//!
//! [`object::ElfObject::read`] parses an ELF32 or ELF64 object file from an
//! in-memory byte slice: identification prefix, file header, program header
//! table, section header table, and (on demand) string and symbol tables.
//! [`riscv::decode`] and [`riscv::pretty_print`] turn a 32-bit instruction
//! word pulled from a section's bytes (typically `.text`) into a decoded
//! [`riscv::Instruction`] and a human-readable pseudo-code rendering.
//!
//! Everything is read from a shared, immutable byte buffer through
//! [`cursor::ByteCursor`] rather than a `Read + Seek` stream: object files
//! are parsed whole, and later passes (symbol lookup, disassembly) need to
//! jump around in already-validated regions rather than stream forward once.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

pub mod cursor;
pub mod error;
pub mod header;
pub mod object;
pub mod program_header;
pub mod riscv;
pub mod section_header;
pub mod symbol;

pub use cursor::{ByteCursor, Endianness};
pub use error::{Error, Result};
pub use header::{ElfClass, ElfFileType, ElfHeader, ElfMachine, ElfOsAbi};
pub use object::{ElfObject, SymbolLocation};
pub use program_header::{ProgramHeader, ProgramHeaderFlags, SegmentType};
pub use riscv::{decode as decode_instruction, pretty_print, Instruction, Opcode};
pub use section_header::{SectionHeader, SectionHeaderFlags, SectionType};
pub use symbol::{Symbol, SYMBOL_ENTRY_SIZE};
