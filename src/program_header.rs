//! Program header table entries: run-time segment descriptions.

use bitflags::bitflags;

use crate::cursor::ByteCursor;
use crate::header::ElfClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
/// The kind of segment a program header describes (`p_type`).
///
/// Carries an [`SegmentType::Other`] fallback for the OS-specific
/// (`PT_LOOS..PT_HIOS`) and processor-specific (`PT_LOPROC..PT_HIPROC`)
/// reserved ranges the gABI defines, rather than failing to parse a file
/// that uses them.
pub enum SegmentType {
    /// Unused entry.
    Null,
    /// Loadable segment.
    Loadable,
    /// Dynamic linking information.
    Dynamic,
    /// Path to an interpreter (dynamic linker).
    Interpreter,
    /// Auxiliary information.
    Note,
    /// Reserved, unspecified semantics.
    Reserved,
    /// Location and size of the program header table itself.
    ProgramHeaderTable,
    /// Thread-local storage template.
    ThreadLocalStorage,
    /// Any `p_type` not named above, including OS/processor-specific and
    /// reserved values, retained verbatim.
    Other(u32),
}

impl SegmentType {
    fn from_u32(value: u32) -> Self {
        use SegmentType::*;
        match value {
            0 => Null,
            1 => Loadable,
            2 => Dynamic,
            3 => Interpreter,
            4 => Note,
            5 => Reserved,
            6 => ProgramHeaderTable,
            7 => ThreadLocalStorage,
            other => Other(other),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Segment permission flags (`p_flags`). Bit 0 is execute, bit 1 is
    /// write, bit 2 is read, per the gABI.
    pub struct ProgramHeaderFlags: u32 {
        /// Segment is executable.
        const EXECUTE = 0x1;
        /// Segment is writable.
        const WRITE = 0x2;
        /// Segment is readable.
        const READ = 0x4;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One program header table entry (`Elf32_Phdr`/`Elf64_Phdr`).
pub struct ProgramHeader {
    /// What kind of segment this is.
    pub segment_type: SegmentType,
    /// Permission flags.
    pub flags: ProgramHeaderFlags,
    /// Offset of the segment's data in the file.
    pub file_offset: u64,
    /// Virtual address at which the segment is to be loaded.
    pub virtual_address: u64,
    /// Physical address, on platforms where this is meaningful.
    pub physical_address: u64,
    /// Size of the segment's data in the file.
    pub file_size: u64,
    /// Size of the segment in memory (may exceed `file_size`, e.g. `.bss`).
    pub memory_size: u64,
    /// Required alignment, a power of two (`0`/`1` mean no constraint).
    pub alignment: u64,
}

impl ProgramHeader {
    /// Parse one program header table entry at the cursor's current
    /// position. Callers re-seek the cursor to
    /// `phoff + i * phentsize` before each call, using the *declared* entry
    /// size rather than `size_of::<ProgramHeader>()` so that padding added
    /// by a newer gABI revision is tolerated.
    pub fn read(cursor: &mut ByteCursor, class: ElfClass) -> Self {
        match class {
            ElfClass::Elf64 => {
                let segment_type = SegmentType::from_u32(cursor.pop_u32());
                let flags = ProgramHeaderFlags::from_bits_truncate(cursor.pop_u32());
                let file_offset = cursor.pop_u64();
                let virtual_address = cursor.pop_u64();
                let physical_address = cursor.pop_u64();
                let file_size = cursor.pop_u64();
                let memory_size = cursor.pop_u64();
                let alignment = cursor.pop_u64();
                Self {
                    segment_type,
                    flags,
                    file_offset,
                    virtual_address,
                    physical_address,
                    file_size,
                    memory_size,
                    alignment,
                }
            }
            ElfClass::Elf32 => {
                let segment_type = SegmentType::from_u32(cursor.pop_u32());
                let file_offset = cursor.pop_u32() as u64;
                let virtual_address = cursor.pop_u32() as u64;
                let physical_address = cursor.pop_u32() as u64;
                let file_size = cursor.pop_u32() as u64;
                let memory_size = cursor.pop_u32() as u64;
                let flags = ProgramHeaderFlags::from_bits_truncate(cursor.pop_u32());
                let alignment = cursor.pop_u32() as u64;
                Self {
                    segment_type,
                    flags,
                    file_offset,
                    virtual_address,
                    physical_address,
                    file_size,
                    memory_size,
                    alignment,
                }
            }
        }
    }
}
