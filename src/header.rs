//! The ELF file header: the 16-byte identification prefix plus the fixed
//! header fields that follow it.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;

use crate::cursor::{ByteCursor, Endianness};
use crate::error::{Error, Result};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
/// Whether the file's objects occupy 32-bit or 64-bit widths (`EI_CLASS`).
pub enum ElfClass {
    /// `ELFCLASS32`: addresses, offsets etc. are 32 bits wide.
    Elf32 = 1,
    /// `ELFCLASS64`: addresses, offsets etc. are 64 bits wide.
    Elf64 = 2,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
/// The file's OS/ABI (`EI_OSABI`).
pub enum ElfOsAbi {
    /// Unix System V ABI.
    SystemV = 0x00,
    /// HP-UX.
    HpUx = 0x01,
    /// NetBSD.
    NetBsd = 0x02,
    /// Linux (object uses GNU ELF extensions).
    Linux = 0x03,
    /// GNU Hurd.
    GnuHurd = 0x04,
    /// Sun Solaris.
    Solaris = 0x06,
    /// IBM AIX.
    Aix = 0x07,
    /// SGI IRIX.
    Irix = 0x08,
    /// FreeBSD.
    FreeBsd = 0x09,
    /// Compaq TRU64 UNIX.
    Tru64 = 0x0A,
    /// Novell Modesto.
    NovellModesto = 0x0B,
    /// OpenBSD.
    OpenBsd = 0x0C,
    /// Open VMS.
    OpenVms = 0x0D,
    /// HP Non-Stop Kernel.
    NonStopKernel = 0x0E,
    /// Amiga Research OS.
    Aros = 0x0F,
    /// FenixOS highly scalable multi-core OS.
    FenixOs = 0x10,
    /// Nuxi CloudABI.
    CloudAbi = 0x11,
    /// Stratus Technologies OpenVOS.
    OpenVos = 0x12,
}

impl ElfOsAbi {
    fn from_u8(value: u8) -> Option<Self> {
        use ElfOsAbi::*;
        Some(match value {
            0x00 => SystemV,
            0x01 => HpUx,
            0x02 => NetBsd,
            0x03 => Linux,
            0x04 => GnuHurd,
            0x06 => Solaris,
            0x07 => Aix,
            0x08 => Irix,
            0x09 => FreeBsd,
            0x0A => Tru64,
            0x0B => NovellModesto,
            0x0C => OpenBsd,
            0x0D => OpenVms,
            0x0E => NonStopKernel,
            0x0F => Aros,
            0x10 => FenixOs,
            0x11 => CloudAbi,
            0x12 => OpenVos,
            _ => return None,
        })
    }
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
/// The object file type (`e_type`).
pub enum ElfFileType {
    /// No file type.
    None = 0,
    /// Relocatable file.
    Relocatable = 1,
    /// Executable file.
    Executable = 2,
    /// Shared object file.
    Shared = 3,
    /// Core file.
    Core = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
/// The target instruction set architecture (`e_machine`).
///
/// This catalog is retained for display purposes only: only
/// [`ElfMachine::Riscv`] is meaningful to the instruction decoder, so an
/// unrecognized value decodes to [`ElfMachine::Other`] rather than failing
/// the whole parse.
pub enum ElfMachine {
    /// Unspecified.
    None,
    /// AT&T WE 32100.
    AttWe32100,
    /// SPARC.
    Sparc,
    /// Intel 80386 (x86).
    X86,
    /// Motorola 68000 (M68k).
    M68k,
    /// Motorola 88000 (M88k).
    M88k,
    /// Intel MCU.
    IntelMcu,
    /// Intel 80860.
    Intel80860,
    /// MIPS.
    Mips,
    /// IBM System/370.
    IbmSystem370,
    /// MIPS RS3000 Little-endian.
    MipsRs3000Le,
    /// Hewlett-Packard PA-RISC.
    PaRisc,
    /// Intel 80960.
    Intel80960,
    /// PowerPC.
    PowerPc,
    /// PowerPC 64-bit.
    PowerPc64,
    /// S390, including S390x.
    S390,
    /// IBM SPU/SPC.
    IbmSpu,
    /// NEC V800.
    NecV800,
    /// Fujitsu FR20.
    FujitsuFr20,
    /// TRW RH-32.
    TrwRh32,
    /// Motorola RCE.
    MotorolaRce,
    /// ARM (up to Armv7/AArch32).
    Arm32,
    /// Digital Alpha.
    DigitalAlpha,
    /// SuperH.
    SuperH,
    /// SPARC Version 9.
    SparcV9,
    /// Siemens TriCore embedded processor.
    TriCore,
    /// Argonaut RISC Core.
    ArgonautRisc,
    /// Hitachi H8/300.
    H8_300,
    /// Hitachi H8/300H.
    H8_300H,
    /// Hitachi H8S.
    H8S,
    /// Hitachi H8/500.
    H8_500,
    /// Intel IA-64.
    Ia64,
    /// Stanford MIPS-X.
    MipsX,
    /// Motorola ColdFire.
    ColdFire,
    /// Motorola M68HC12.
    M68hc12,
    /// AMD x86-64.
    Amd64,
    /// ARM 64-bit (AArch64).
    Aarch64,
    /// RISC-V.
    Riscv,
    /// Berkeley Packet Filter.
    Bpf,
    /// Any machine value not named above, retained verbatim for display.
    Other(u16),
}

impl ElfMachine {
    fn from_u16(value: u16) -> Self {
        use ElfMachine::*;
        match value {
            0x00 => None,
            0x01 => AttWe32100,
            0x02 => Sparc,
            0x03 => X86,
            0x04 => M68k,
            0x05 => M88k,
            0x06 => IntelMcu,
            0x07 => Intel80860,
            0x08 => Mips,
            0x09 => IbmSystem370,
            0x0A => MipsRs3000Le,
            0x0F => PaRisc,
            0x13 => Intel80960,
            0x14 => PowerPc,
            0x15 => PowerPc64,
            0x16 => S390,
            0x17 => IbmSpu,
            0x24 => NecV800,
            0x25 => FujitsuFr20,
            0x26 => TrwRh32,
            0x27 => MotorolaRce,
            0x28 => Arm32,
            0x29 => DigitalAlpha,
            0x2A => SuperH,
            0x2B => SparcV9,
            0x2C => TriCore,
            0x2D => ArgonautRisc,
            0x2E => H8_300,
            0x2F => H8_300H,
            0x30 => H8S,
            0x31 => H8_500,
            0x32 => Ia64,
            0x33 => MipsX,
            0x34 => ColdFire,
            0x35 => M68hc12,
            0x3E => Amd64,
            0xB7 => Aarch64,
            0xF3 => Riscv,
            0xF7 => Bpf,
            other => Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The ELF file header (`Elf32_Ehdr`/`Elf64_Ehdr`).
pub struct ElfHeader {
    /// 32-bit or 64-bit object.
    pub class: ElfClass,
    /// Byte order of every multi-byte field from here on.
    pub endianness: Endianness,
    /// OS/ABI extensions this file targets.
    pub os_abi: ElfOsAbi,
    /// ABI version, interpretation depends on `os_abi`.
    pub abi_version: u8,
    /// Object file type.
    pub file_type: ElfFileType,
    /// Target machine ISA.
    pub machine: ElfMachine,
    /// Virtual address of the entry point.
    pub entry: u64,
    /// File offset of the program header table.
    pub program_header_offset: u64,
    /// File offset of the section header table.
    pub section_header_offset: u64,
    /// Processor-specific flags.
    pub flags: u32,
    /// Size of this header, in bytes.
    pub header_size: u16,
    /// Size of one program header table entry, in bytes.
    pub program_header_entry_size: u16,
    /// Number of entries in the program header table.
    pub program_header_count: u16,
    /// Size of one section header table entry, in bytes.
    pub section_header_entry_size: u16,
    /// Number of entries in the section header table.
    pub section_header_count: u16,
    /// Index, in the section header table, of the section-name string
    /// table (`.shstrtab`).
    pub section_name_table_index: u16,
}

impl ElfHeader {
    /// Parse the ELF header starting at the cursor's current position
    /// (expected to be `0`). On return, `cursor`'s endianness has been set
    /// from `EI_DATA` and applies to all subsequent reads of the file.
    pub fn read(cursor: &mut ByteCursor) -> Result<Self> {
        if cursor.size() < 16 {
            return Err(Error::TruncatedInput {
                needed: 16,
                len: cursor.size(),
            });
        }

        let magic = [
            cursor.pop_u8(),
            cursor.pop_u8(),
            cursor.pop_u8(),
            cursor.pop_u8(),
        ];
        if magic != [0x7F, b'E', b'L', b'F'] {
            return Err(Error::BadMagic { found: magic });
        }

        let class_byte = cursor.pop_u8();
        let class =
            ElfClass::from_u8(class_byte).ok_or(Error::InvalidClass { value: class_byte })?;

        let data_byte = cursor.pop_u8();
        let endianness = match data_byte {
            1 => Endianness::Little,
            2 => Endianness::Big,
            _ => return Err(Error::InvalidDataEncoding { value: data_byte }),
        };
        cursor.set_endianness(endianness);

        let version = cursor.pop_u8();
        if version != 1 {
            return Err(Error::InvalidVersion {
                value: version as u32,
            });
        }

        let os_abi_byte = cursor.pop_u8();
        let os_abi = ElfOsAbi::from_u8(os_abi_byte).ok_or(Error::InvalidOsAbi {
            value: os_abi_byte,
        })?;

        let abi_version = cursor.pop_u8();
        cursor.skip(7);

        let addr_width = match class {
            ElfClass::Elf32 => 4,
            ElfClass::Elf64 => 8,
        };
        let remaining_needed = 2 + 2 + 4 + 3 * addr_width + 4 + 2 * 6;
        if cursor.size() - cursor.index() < remaining_needed {
            return Err(Error::TruncatedInput {
                needed: cursor.index() + remaining_needed,
                len: cursor.size(),
            });
        }

        let file_type_raw = cursor.pop_u16();
        let file_type = ElfFileType::from_u16(file_type_raw).ok_or(Error::InvalidFileType {
            value: file_type_raw,
        })?;

        let machine = ElfMachine::from_u16(cursor.pop_u16());

        let version2 = cursor.pop_u32();
        if version2 != 1 {
            return Err(Error::InvalidVersion { value: version2 });
        }

        let (entry, program_header_offset, section_header_offset) = match class {
            ElfClass::Elf64 => (
                cursor.pop_u64(),
                cursor.pop_u64(),
                cursor.pop_u64(),
            ),
            ElfClass::Elf32 => (
                cursor.pop_u32() as u64,
                cursor.pop_u32() as u64,
                cursor.pop_u32() as u64,
            ),
        };

        let flags = cursor.pop_u32();
        let header_size = cursor.pop_u16();
        let program_header_entry_size = cursor.pop_u16();
        let program_header_count = cursor.pop_u16();
        let section_header_entry_size = cursor.pop_u16();
        let section_header_count = cursor.pop_u16();
        let section_name_table_index = cursor.pop_u16();

        Ok(Self {
            class,
            endianness,
            os_abi,
            abi_version,
            file_type,
            machine,
            entry,
            program_header_offset,
            section_header_offset,
            flags,
            header_size,
            program_header_entry_size,
            program_header_count,
            section_header_entry_size,
            section_header_count,
            section_name_table_index,
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test {
    use super::*;

    fn minimal_header_bytes(class: u8, data: u8) -> Vec<u8> {
        let mut v = vec![0x7F, b'E', b'L', b'F', class, data, 1, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        let addr_width = if class == 1 { 4 } else { 8 };
        let put16 = |v: &mut Vec<u8>, x: u16| {
            if data == 1 {
                v.extend_from_slice(&x.to_le_bytes());
            } else {
                v.extend_from_slice(&x.to_be_bytes());
            }
        };
        let put32 = |v: &mut Vec<u8>, x: u32| {
            if data == 1 {
                v.extend_from_slice(&x.to_le_bytes());
            } else {
                v.extend_from_slice(&x.to_be_bytes());
            }
        };
        // e_type, e_machine
        put16(&mut v, 2); // Executable
        put16(&mut v, 0xF3); // RISC-V
        put32(&mut v, 1); // e_version
        for _ in 0..3 {
            // entry, phoff, shoff
            if addr_width == 8 {
                put32(&mut v, 0);
                put32(&mut v, 0);
            } else {
                put32(&mut v, 0);
            }
        }
        put32(&mut v, 0); // flags
        for _ in 0..6 {
            put16(&mut v, 0);
        }
        v
    }

    #[test]
    fn class_and_endianness_matrix() {
        for (class, data) in [(1u8, 1u8), (1, 2), (2, 1), (2, 2)] {
            let bytes = minimal_header_bytes(class, data);
            let mut cursor = ByteCursor::new(bytes.into_boxed_slice());
            let header = ElfHeader::read(&mut cursor).expect("valid minimal header");
            assert_eq!(header.file_type, ElfFileType::Executable);
            assert_eq!(header.machine, ElfMachine::Riscv);
        }
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut cursor = ByteCursor::new(
            vec![0x00, b'E', b'L', b'F', 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0].into_boxed_slice(),
        );
        let err = ElfHeader::read(&mut cursor).unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
    }
}
