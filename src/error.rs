//! Error type for ELF object and RISC-V instruction decoding.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Everything that can go wrong while decoding an ELF object file or a
/// RISC-V instruction word.
pub enum Error {
    #[error("bad magic: expected 0x7F 'E' 'L' 'F', found {found:02x?}")]
    /// The first four bytes of the file are not the ELF magic number.
    BadMagic {
        /// The four bytes actually found at the start of the file.
        found: [u8; 4],
    },

    #[error("invalid ELF class byte {value:#04x} (expected 1 for ELF32 or 2 for ELF64)")]
    /// `EI_CLASS` was neither 1 (32-bit) nor 2 (64-bit).
    InvalidClass {
        /// The raw byte read from the file.
        value: u8,
    },

    #[error("invalid data encoding byte {value:#04x} (expected 1 for little-endian or 2 for big-endian)")]
    /// `EI_DATA` was neither 1 (little-endian) nor 2 (big-endian).
    InvalidDataEncoding {
        /// The raw byte read from the file.
        value: u8,
    },

    #[error("invalid ELF identifier version {value} (expected 1)")]
    /// `EI_VERSION` (or `e_version`) was not 1.
    InvalidVersion {
        /// The raw byte or word read from the file.
        value: u32,
    },

    #[error("invalid OS ABI byte {value:#04x}")]
    /// `EI_OSABI` fell outside the recognized catalog.
    InvalidOsAbi {
        /// The raw byte read from the file.
        value: u8,
    },

    #[error("invalid file type {value:#06x} (expected one of None/Rel/Exec/Shared/Core)")]
    /// `e_type` was not one of the five defined file types.
    InvalidFileType {
        /// The raw half-word read from the file.
        value: u16,
    },

    #[error("section [{offset}, {offset}+{size}) exceeds the {len}-byte input buffer")]
    /// A section header's `(sh_offset, sh_size)` pair describes a range that
    /// does not fit inside the input buffer.
    SectionOutOfBounds {
        /// The section's declared file offset.
        offset: u64,
        /// The section's declared size.
        size: u64,
        /// The length of the backing buffer.
        len: usize,
    },

    #[error("input buffer is truncated: needed at least {needed} bytes, found {len}")]
    /// The buffer is too short to contain a structure that a preceding,
    /// already-parsed field promised would be present (e.g. the ELF header
    /// itself, or a header table entry at its declared offset).
    TruncatedInput {
        /// The number of bytes required to proceed.
        needed: usize,
        /// The number of bytes actually available.
        len: usize,
    },

    #[error("more than one zero-flag string table section; expected exactly one")]
    /// [`crate::object::ElfObject::get_string_table`] found more than one
    /// section of type `StringTable` with zero flags.
    AmbiguousStringTable,

    #[error("no symbol table (.symtab or .dynsym) present")]
    /// Neither `.symtab` nor `.dynsym` is present.
    MissingSymbolTable,

    #[error("no companion string table ({expected}) for the symbol table")]
    /// The symbol table's companion string table (`.strtab` for `.symtab`,
    /// `.dynstr` for `.dynsym`) is missing.
    MissingStringTable {
        /// The name of the string table section that was expected.
        expected: &'static str,
    },

    #[error("unexpected symbol table entry size {found} (expected 24)")]
    /// A symbol table's `sh_entsize` was not 24, the fixed size of
    /// `Elf64_Sym`.
    UnexpectedSymbolEntrySize {
        /// The entry size actually declared by the section header.
        found: u64,
    },

    #[error("no section-name string table at index {index} (e_shstrndx)")]
    /// `e_shstrndx` does not index a valid section, or the indexed section
    /// is not a string table.
    InvalidSectionNameIndex {
        /// The index recorded in the ELF header.
        index: u16,
    },
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
