//! Section header table entries: link-time section descriptions, including
//! the sub-cursor over each section's own file data.

use bitflags::bitflags;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::header::ElfClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
/// The kind of content a section holds (`sh_type`).
///
/// Carries a [`SectionType::Other`] fallback for OS-specific
/// (`SHT_LOOS..SHT_HIOS`) and processor-specific (`SHT_LOPROC..SHT_HIPROC`)
/// values — real binaries commonly carry e.g. a RISC-V attributes section
/// tagged `0x70000003` or a GNU hash section tagged `0x6ffffff6`, and this
/// parser decodes them structurally rather than rejecting the file.
pub enum SectionType {
    /// Inactive section header; other members are undefined.
    Null,
    /// Program-defined data (e.g. `.text`, `.data`).
    ProgramData,
    /// A symbol table (e.g. `.symtab`).
    SymbolTable,
    /// A string table (e.g. `.strtab`, `.dynstr`, `.shstrtab`).
    StringTable,
    /// Relocation entries with explicit addends.
    RelocationWithAddends,
    /// A symbol hash table.
    SymbolHashTable,
    /// Dynamic linking information.
    DynamicLinkingInfo,
    /// Notes.
    Notes,
    /// Occupies no file space but otherwise resembles `ProgramData`
    /// (e.g. `.bss`).
    NoBits,
    /// Relocation entries without explicit addends.
    Relocation,
    /// A minimal symbol table for dynamic linking (e.g. `.dynsym`).
    DynamicLinkerSymbolTable,
    /// Array of constructor function pointers.
    ConstructorArray,
    /// Array of destructor function pointers.
    DestructorArray,
    /// Array of pre-constructor function pointers.
    PreConstructorArray,
    /// Defines a section group.
    Group,
    /// Extended section indices for a symbol table using `SHN_XINDEX`.
    ExtendedIndices,
    /// Any `sh_type` not named above, including OS/processor-specific and
    /// reserved values, retained verbatim.
    Other(u32),
}

impl SectionType {
    fn from_u32(value: u32) -> Self {
        use SectionType::*;
        match value {
            0x00 => Null,
            0x01 => ProgramData,
            0x02 => SymbolTable,
            0x03 => StringTable,
            0x04 => RelocationWithAddends,
            0x05 => SymbolHashTable,
            0x06 => DynamicLinkingInfo,
            0x07 => Notes,
            0x08 => NoBits,
            0x09 => Relocation,
            0x0B => DynamicLinkerSymbolTable,
            0x0E => ConstructorArray,
            0x0F => DestructorArray,
            0x10 => PreConstructorArray,
            0x11 => Group,
            0x12 => ExtendedIndices,
            other => Other(other),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Section attribute flags (`sh_flags`).
    pub struct SectionHeaderFlags: u64 {
        /// Section contains writable data during execution.
        const WRITE = 0x1;
        /// Section occupies memory during execution.
        const ALLOC = 0x2;
        /// Section contains executable instructions.
        const EXECINSTR = 0x4;
        /// Section data may be merged to eliminate duplication.
        const MERGE = 0x10;
        /// Section data is null-terminated strings.
        const STRINGS = 0x20;
        /// `sh_info` holds a section header table index.
        const INFO_LINK = 0x40;
        /// Section has special ordering requirements wrt `sh_link`.
        const LINK_ORDER = 0x80;
        /// Section requires OS-specific processing beyond the standard
        /// linking semantics.
        const OS_NONCONFORMING = 0x100;
        /// Section is a member of a section group.
        const GROUP = 0x200;
        /// Section holds thread-local storage.
        const TLS = 0x400;
        /// Bits reserved for OS-specific semantics.
        const MASKOS = 0x0FF00000;
        /// Bits reserved for processor-specific semantics.
        const MASKPROC = 0xF000_0000;
    }
}

#[derive(Debug, Clone)]
/// One section header table entry (`Elf32_Shdr`/`Elf64_Shdr`), plus an
/// owned, read-only sub-cursor over the section's own file data.
pub struct SectionHeader {
    /// Offset of this section's name in the section-name string table.
    pub name_offset: u32,
    /// What kind of content this section holds.
    pub section_type: SectionType,
    /// Attribute flags.
    pub flags: SectionHeaderFlags,
    /// Virtual address at execution, or `0` if not loaded.
    pub virtual_address: u64,
    /// Offset of the section's data in the file.
    pub file_offset: u64,
    /// Size of the section's data, in bytes.
    pub size: u64,
    /// Section header table index of an associated section (meaning
    /// depends on `section_type`).
    pub link: u32,
    /// Extra information (meaning depends on `section_type`).
    pub info: u32,
    /// Required alignment, a power of two (`0`/`1` mean no constraint).
    pub alignment: u64,
    /// Size of one entry, for sections holding a table of fixed-size
    /// entries (`0` otherwise).
    pub entry_size: u64,
    /// A read-only cursor over exactly `[file_offset, file_offset+size)`
    /// of the file, inheriting the parent cursor's endianness. This is the
    /// basis for string table, symbol table, and instruction decoding.
    pub data: ByteCursor,
}

impl SectionHeader {
    /// Parse one section header table entry at the cursor's current
    /// position, then capture a sub-cursor over its file data. Returns
    /// [`Error::SectionOutOfBounds`] if `(sh_offset, sh_size)` does not fit
    /// inside `file`, since an out-of-bounds offset here comes directly
    /// from untrusted input rather than from a bug in this crate.
    pub fn read(cursor: &mut ByteCursor, class: ElfClass, file: &ByteCursor) -> Result<Self> {
        let (
            name_offset,
            section_type,
            flags,
            virtual_address,
            file_offset,
            size,
            link,
            info,
            alignment,
            entry_size,
        ) = match class {
            ElfClass::Elf64 => {
                let name_offset = cursor.pop_u32();
                let section_type = SectionType::from_u32(cursor.pop_u32());
                let flags = SectionHeaderFlags::from_bits_truncate(cursor.pop_u64());
                let virtual_address = cursor.pop_u64();
                let file_offset = cursor.pop_u64();
                let size = cursor.pop_u64();
                let link = cursor.pop_u32();
                let info = cursor.pop_u32();
                let alignment = cursor.pop_u64();
                let entry_size = cursor.pop_u64();
                (
                    name_offset,
                    section_type,
                    flags,
                    virtual_address,
                    file_offset,
                    size,
                    link,
                    info,
                    alignment,
                    entry_size,
                )
            }
            ElfClass::Elf32 => {
                let name_offset = cursor.pop_u32();
                let section_type = SectionType::from_u32(cursor.pop_u32());
                let flags = SectionHeaderFlags::from_bits_truncate(cursor.pop_u32() as u64);
                let virtual_address = cursor.pop_u32() as u64;
                let file_offset = cursor.pop_u32() as u64;
                let size = cursor.pop_u32() as u64;
                let link = cursor.pop_u32();
                let info = cursor.pop_u32();
                let alignment = cursor.pop_u32() as u64;
                let entry_size = cursor.pop_u32() as u64;
                (
                    name_offset,
                    section_type,
                    flags,
                    virtual_address,
                    file_offset,
                    size,
                    link,
                    info,
                    alignment,
                    entry_size,
                )
            }
        };

        let start = usize::try_from(file_offset).map_err(|_| Error::SectionOutOfBounds {
            offset: file_offset,
            size,
            len: file.size(),
        })?;
        let len = usize::try_from(size).map_err(|_| Error::SectionOutOfBounds {
            offset: file_offset,
            size,
            len: file.size(),
        })?;
        let end = start.checked_add(len).ok_or(Error::SectionOutOfBounds {
            offset: file_offset,
            size,
            len: file.size(),
        })?;
        if section_type != SectionType::NoBits && end > file.size() {
            return Err(Error::SectionOutOfBounds {
                offset: file_offset,
                size,
                len: file.size(),
            });
        }
        // SHT_NOBITS sections (.bss) occupy no file space; their declared
        // range need not fit in the file, and their data cursor is empty.
        let data = if section_type == SectionType::NoBits {
            file.slice(start.min(file.size()), start.min(file.size()))
        } else {
            file.slice(start, end)
        };

        Ok(Self {
            name_offset,
            section_type,
            flags,
            virtual_address,
            file_offset,
            size,
            link,
            info,
            alignment,
            entry_size,
            data,
        })
    }
}
