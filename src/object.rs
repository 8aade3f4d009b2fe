//! The ELF object model: header plus program and section header tables, and
//! the cross-section lookups built on top of them.

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::header::ElfHeader;
use crate::program_header::ProgramHeader;
use crate::section_header::{SectionHeader, SectionHeaderFlags, SectionType};
use crate::symbol::{Symbol, SYMBOL_ENTRY_SIZE};

/// The value and size of a resolved symbol (the result of
/// [`ElfObject::get_symbol_location`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolLocation {
    /// The symbol's value (typically a virtual address).
    pub value: u64,
    /// The symbol's size in bytes.
    pub size: u64,
}

/// A fully decoded ELF object file: its header, and its program and section
/// header tables in file order.
#[derive(Debug, Clone)]
pub struct ElfObject {
    /// The ELF file header.
    pub header: ElfHeader,
    /// Program header table entries, in file order.
    pub program_headers: Vec<ProgramHeader>,
    /// Section header table entries, in file order.
    pub section_headers: Vec<SectionHeader>,
}

impl ElfObject {
    /// Decode a complete ELF object from `bytes`: the header, then the
    /// program header table (`phoff`, `phnum` entries of `phentsize` bytes
    /// each) and the section header table (`shoff`, `shnum` entries of
    /// `shentsize` bytes each), each table read by re-seeking to
    /// `offset + i * entsize` before every entry.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let file = ByteCursor::new(bytes);
        let mut cursor = file.clone();
        let header = ElfHeader::read(&mut cursor)?;

        let mut program_headers = Vec::with_capacity(header.program_header_count as usize);
        for i in 0..header.program_header_count as u64 {
            let offset = header.program_header_offset + i * header.program_header_entry_size as u64;
            let offset = usize::try_from(offset).map_err(|_| Error::TruncatedInput {
                needed: offset as usize,
                len: bytes.len(),
            })?;
            if offset + header.program_header_entry_size as usize > bytes.len() {
                return Err(Error::TruncatedInput {
                    needed: offset + header.program_header_entry_size as usize,
                    len: bytes.len(),
                });
            }
            let mut entry_cursor =
                file.slice(offset, offset + header.program_header_entry_size as usize);
            entry_cursor.set_endianness(header.endianness);
            program_headers.push(ProgramHeader::read(&mut entry_cursor, header.class));
        }

        let mut section_headers = Vec::with_capacity(header.section_header_count as usize);
        for i in 0..header.section_header_count as u64 {
            let offset = header.section_header_offset + i * header.section_header_entry_size as u64;
            let offset = usize::try_from(offset).map_err(|_| Error::TruncatedInput {
                needed: offset as usize,
                len: bytes.len(),
            })?;
            if offset + header.section_header_entry_size as usize > bytes.len() {
                return Err(Error::TruncatedInput {
                    needed: offset + header.section_header_entry_size as usize,
                    len: bytes.len(),
                });
            }
            let mut entry_cursor =
                file.slice(offset, offset + header.section_header_entry_size as usize);
            entry_cursor.set_endianness(header.endianness);
            section_headers.push(SectionHeader::read(&mut entry_cursor, header.class, &file)?);
        }

        Ok(Self {
            header,
            program_headers,
            section_headers,
        })
    }

    /// The section-name string table, selected directly by `e_shstrndx`
    /// (the gABI-correct approach; see SPEC_FULL.md §4's resolution of the
    /// string-table-selection open question).
    pub fn shstrtab(&self) -> Result<&SectionHeader> {
        self.section_headers
            .get(self.header.section_name_table_index as usize)
            .ok_or(Error::InvalidSectionNameIndex {
                index: self.header.section_name_table_index,
            })
    }

    /// The unique section header of type `StringTable` with zero flags.
    ///
    /// This is a linear scan for the one unflagged string table, erroring
    /// if more than one qualifies. In a real ELF file, `.strtab`/`.dynstr` are also commonly
    /// flag-less, so this can over-reject; prefer [`Self::shstrtab`] for
    /// section-name lookups (the resolution [`ElfObject::get_section_by_name`]
    /// actually uses).
    pub fn get_string_table(&self) -> Result<Option<&SectionHeader>> {
        let mut found = None;
        for section in &self.section_headers {
            if section.section_type == SectionType::StringTable
                && section.flags == SectionHeaderFlags::empty()
            {
                if found.is_some() {
                    return Err(Error::AmbiguousStringTable);
                }
                found = Some(section);
            }
        }
        Ok(found)
    }

    /// Find the section header whose name, read from the section-name
    /// string table, exactly matches `name`. Returns the first match in
    /// table order.
    pub fn get_section_by_name(&self, name: &[u8]) -> Result<Option<&SectionHeader>> {
        let shstrtab = self.shstrtab()?;
        for section in &self.section_headers {
            let mut strings = shstrtab.data.clone();
            strings.seek(section.name_offset as usize);
            if strings.pop_null_string() == name {
                return Ok(Some(section));
            }
        }
        Ok(None)
    }

    /// `.symtab` if present, else `.dynsym`, else `None`.
    pub fn get_symbol_table(&self) -> Result<Option<&SectionHeader>> {
        if let Some(symtab) = self.get_section_by_name(b".symtab")? {
            return Ok(Some(symtab));
        }
        self.get_section_by_name(b".dynsym")
    }

    /// Resolve `name` to its value and size by scanning the symbol table
    /// and its companion string table (`.strtab` for `.symtab`, `.dynstr`
    /// for `.dynsym`). The first matching entry wins.
    pub fn get_symbol_location(&self, name: &[u8]) -> Result<Option<SymbolLocation>> {
        let symtab = self
            .get_symbol_table()?
            .ok_or(Error::MissingSymbolTable)?;

        let companion_name: &[u8] = if symtab.section_type == SectionType::SymbolTable {
            b".strtab"
        } else {
            b".dynstr"
        };
        let strtab = self
            .get_section_by_name(companion_name)?
            .ok_or(Error::MissingStringTable {
                expected: if companion_name == b".strtab" {
                    ".strtab"
                } else {
                    ".dynstr"
                },
            })?;

        if symtab.entry_size != SYMBOL_ENTRY_SIZE {
            return Err(Error::UnexpectedSymbolEntrySize {
                found: symtab.entry_size,
            });
        }

        let count = symtab.size / SYMBOL_ENTRY_SIZE;
        let mut symbols = symtab.data.clone();
        let mut strings = strtab.data.clone();
        for i in 0..count {
            symbols.seek((i * SYMBOL_ENTRY_SIZE) as usize);
            let sym = Symbol::read(&mut symbols);

            strings.seek(sym.name_offset as usize);
            if strings.pop_null_string() == name {
                return Ok(Some(SymbolLocation {
                    value: sym.value,
                    size: sym.size,
                }));
            }
        }

        Ok(None)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test {
    use super::*;

    /// Build a minimal but complete 64-bit little-endian ELF with one
    /// `.text`, `.symtab`, `.strtab` and `.shstrtab` section, and a single
    /// defined symbol `quad` pointing into `.text`.
    fn build_test_object() -> Vec<u8> {
        let text: &[u8] = &0x00800513u32.to_le_bytes(); // addi x10, x0, 8

        let shstrtab_strings: &[u8] = b"\0.text\0.symtab\0.strtab\0.shstrtab\0";
        let strtab_strings: &[u8] = b"\0quad\0";

        let mut symtab = Vec::new();
        // NULL symbol
        symtab.extend_from_slice(&[0u8; 24]);
        // `quad` symbol: name offset 1, info=0x12, other=0, shndx=1, value, size
        symtab.extend_from_slice(&1u32.to_le_bytes());
        symtab.push(0x12);
        symtab.push(0);
        symtab.extend_from_slice(&1u16.to_le_bytes());
        symtab.extend_from_slice(&0x1000u64.to_le_bytes());
        symtab.extend_from_slice(&4u64.to_le_bytes());

        let ehdr_size = 64usize;
        let shdr_entsize = 64usize;
        let n_sections = 5; // NULL, .text, .symtab, .strtab, .shstrtab

        let text_off = ehdr_size;
        let symtab_off = text_off + text.len();
        let strtab_off = symtab_off + symtab.len();
        let shstrtab_off = strtab_off + strtab_strings.len();
        let shoff = shstrtab_off + shstrtab_strings.len();

        let mut file = Vec::new();
        file.extend_from_slice(&[0x7F, b'E', b'L', b'F', 2, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        file.extend_from_slice(&2u16.to_le_bytes()); // e_type
        file.extend_from_slice(&0xF3u16.to_le_bytes()); // e_machine RISC-V
        file.extend_from_slice(&1u32.to_le_bytes()); // e_version
        file.extend_from_slice(&0u64.to_le_bytes()); // entry
        file.extend_from_slice(&0u64.to_le_bytes()); // phoff
        file.extend_from_slice(&(shoff as u64).to_le_bytes()); // shoff
        file.extend_from_slice(&0u32.to_le_bytes()); // flags
        file.extend_from_slice(&(ehdr_size as u16).to_le_bytes()); // ehsize
        file.extend_from_slice(&0u16.to_le_bytes()); // phentsize
        file.extend_from_slice(&0u16.to_le_bytes()); // phnum
        file.extend_from_slice(&(shdr_entsize as u16).to_le_bytes()); // shentsize
        file.extend_from_slice(&(n_sections as u16).to_le_bytes()); // shnum
        file.extend_from_slice(&4u16.to_le_bytes()); // shstrndx (index 4 below)
        assert_eq!(file.len(), ehdr_size);

        file.extend_from_slice(text);
        file.extend_from_slice(&symtab);
        file.extend_from_slice(strtab_strings);
        file.extend_from_slice(shstrtab_strings);
        assert_eq!(file.len(), shoff);

        let sh = |name_off: u32, ty: u32, flags: u64, off: u64, size: u64, link: u32, entsize: u64| {
            let mut v = Vec::new();
            v.extend_from_slice(&name_off.to_le_bytes());
            v.extend_from_slice(&ty.to_le_bytes());
            v.extend_from_slice(&flags.to_le_bytes());
            v.extend_from_slice(&0u64.to_le_bytes()); // vaddr
            v.extend_from_slice(&off.to_le_bytes());
            v.extend_from_slice(&size.to_le_bytes());
            v.extend_from_slice(&link.to_le_bytes());
            v.extend_from_slice(&0u32.to_le_bytes()); // info
            v.extend_from_slice(&1u64.to_le_bytes()); // align
            v.extend_from_slice(&entsize.to_le_bytes());
            assert_eq!(v.len(), shdr_entsize);
            v
        };

        // NULL section
        file.extend_from_slice(&sh(0, 0, 0, 0, 0, 0, 0));
        // .text (name offset 1 in shstrtab)
        file.extend_from_slice(&sh(1, 1, 0x6, text_off as u64, text.len() as u64, 0, 0));
        // .symtab (name offset 7), links to .strtab (section index 3)
        file.extend_from_slice(&sh(
            7,
            2,
            0,
            symtab_off as u64,
            symtab.len() as u64,
            3,
            24,
        ));
        // .strtab (name offset 15)
        file.extend_from_slice(&sh(
            15,
            3,
            0,
            strtab_off as u64,
            strtab_strings.len() as u64,
            0,
            0,
        ));
        // .shstrtab (name offset 23)
        file.extend_from_slice(&sh(
            23,
            3,
            0,
            shstrtab_off as u64,
            shstrtab_strings.len() as u64,
            0,
            0,
        ));

        file
    }

    #[test]
    fn table_size_agreement() {
        let bytes = build_test_object();
        let obj = ElfObject::read(&bytes).unwrap();
        assert_eq!(
            obj.program_headers.len(),
            obj.header.program_header_count as usize
        );
        assert_eq!(
            obj.section_headers.len(),
            obj.header.section_header_count as usize
        );
    }

    #[test]
    fn section_name_lookup() {
        let bytes = build_test_object();
        let obj = ElfObject::read(&bytes).unwrap();
        assert!(obj.get_section_by_name(b".text").unwrap().is_some());
        assert!(obj.get_section_by_name(b".missing").unwrap().is_none());
    }

    #[test]
    fn symbol_lookup_end_to_end() {
        let bytes = build_test_object();
        let obj = ElfObject::read(&bytes).unwrap();
        let loc = obj.get_symbol_location(b"quad").unwrap().unwrap();
        assert_eq!(loc.value, 0x1000);
        assert_eq!(loc.size, 4);
        assert!(loc.size > 0 && loc.size % 4 == 0);
    }

    #[test]
    fn missing_symbol_returns_none() {
        let bytes = build_test_object();
        let obj = ElfObject::read(&bytes).unwrap();
        assert!(obj.get_symbol_location(b"nonexistent").unwrap().is_none());
    }

    #[test]
    fn get_string_table_rejects_multiple_zero_flag_string_tables() {
        // build_test_object's .strtab and .shstrtab are both type StringTable
        // with zero flags, matching the real-world over-rejection spec.md §9
        // warns about; shstrtab()/get_section_by_name sidestep it by indexing
        // e_shstrndx directly instead.
        let bytes = build_test_object();
        let obj = ElfObject::read(&bytes).unwrap();
        let err = obj.get_string_table().unwrap_err();
        assert!(matches!(err, Error::AmbiguousStringTable));
    }
}
