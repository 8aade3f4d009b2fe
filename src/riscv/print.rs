//! Rendering a decoded instruction as human-readable pseudo-code.

use super::decode::{Instruction, Opcode};

fn reg(n: u8) -> String {
    format!("x{n}")
}

/// Render a decoded instruction as a one-line pseudo-code string, e.g.
/// `x10 = x0 + 8` for `addi x10, x0, 8`.
///
/// Unsigned comparisons and shifts (`SLTU`, `SLTIU`, `SRL`, `SRLI`) render
/// with a `u` suffix on the operator (`<u`, `>>u`) to distinguish them from
/// their signed counterparts, since plain `<`/`>>` would otherwise silently
/// imply signed semantics for both.
pub fn pretty_print(instr: &Instruction) -> String {
    match *instr {
        Instruction::I { opcode, rd, funct3, rs1, imm } => match opcode {
            Opcode::Load => load(rd, funct3, rs1, imm),
            Opcode::Jalr => {
                if rd == 0 && rs1 == 1 && imm == 0 {
                    "return".to_string()
                } else {
                    format!("{} = pc + 4; pc = {} + {}", reg(rd), reg(rs1), imm)
                }
            }
            Opcode::OpImm => op_imm(rd, funct3, rs1, imm),
            _ => format!("{:?} {}, {}, {}", opcode, reg(rd), reg(rs1), imm),
        },
        Instruction::R { opcode, rd, funct3, rs1, rs2, funct7 } => match opcode {
            Opcode::Op => op(rd, funct3, rs1, rs2, funct7),
            _ => format!("{:?} {}, {}, {}", opcode, reg(rd), reg(rs1), reg(rs2)),
        },
        Instruction::S { opcode, imm, funct3, rs1, rs2 } => match opcode {
            Opcode::Store => store(funct3, rs1, rs2, imm),
            Opcode::Branch => branch(funct3, rs1, rs2, imm),
            _ => format!("{opcode:?} {imm}({}), {}", reg(rs1), reg(rs2)),
        },
        Instruction::U { opcode, rd, imm } => match opcode {
            Opcode::Lui => format!("{} = {}", reg(rd), imm),
            Opcode::Auipc => format!("{} = pc + {}", reg(rd), imm),
            Opcode::Jal => format!("{} = pc + 4; pc = pc + {}", reg(rd), imm),
            _ => format!("{:?} {}, {}", opcode, reg(rd), imm),
        },
        Instruction::Opaque { opcode } => format!("<unrecognized: {opcode:?}>"),
    }
}

fn load(rd: u8, funct3: u8, rs1: u8, imm: i64) -> String {
    let rd = reg(rd);
    let rs1 = reg(rs1);
    let op = match funct3 {
        0b000 => "LB",
        0b001 => "LH",
        0b010 => "LW",
        0b100 => "LBU",
        0b101 => "LHU",
        _ => return "??? (fall-through)".to_string(),
    };
    format!("{rd} = {op}({rs1} + {imm})")
}

fn op_imm(rd: u8, funct3: u8, rs1: u8, imm: i64) -> String {
    let rd = reg(rd);
    let rs1 = reg(rs1);
    match funct3 {
        0b000 => format!("{rd} = {rs1} + {imm}"), // ADDI
        0b010 => format!("{rd} = ({rs1} < {imm})"), // SLTI
        0b011 => format!("{rd} = ({rs1} <u {imm})"), // SLTIU
        0b100 => format!("{rd} = {rs1} ^ {imm}"), // XORI
        0b110 => format!("{rd} = {rs1} | {imm}"), // ORI
        0b111 => format!("{rd} = {rs1} & {imm}"), // ANDI
        0b001 => format!("{rd} = {rs1} << {}", imm & 0x1F), // SLLI
        0b101 => {
            // SRLI/SRAI share funct3; the encoding distinguishes them via
            // bit 10 of the immediate (mirrored from funct7[5] in the
            // register-register form).
            let shamt = imm & 0x1F;
            if imm & 0x400 != 0 {
                format!("{rd} = {rs1} >> {shamt}") // SRAI (arithmetic)
            } else {
                format!("{rd} = {rs1} >>u {shamt}") // SRLI (logical)
            }
        }
        _ => "??? (fall-through)".to_string(),
    }
}

fn op(rd: u8, funct3: u8, rs1: u8, rs2: u8, funct7: u8) -> String {
    let rd = reg(rd);
    let rs1 = reg(rs1);
    let rs2 = reg(rs2);
    match (funct7, funct3) {
        (0x00, 0b000) => format!("{rd} = {rs1} + {rs2}"), // ADD
        (0x20, 0b000) => format!("{rd} = {rs1} - {rs2}"), // SUB
        (0x00, 0b001) => format!("{rd} = {rs1} << {rs2}"), // SLL
        (0x00, 0b010) => format!("{rd} = ({rs1} < {rs2})"), // SLT
        (0x00, 0b011) => format!("{rd} = ({rs1} <u {rs2})"), // SLTU
        (0x00, 0b100) => format!("{rd} = {rs1} ^ {rs2}"), // XOR
        (0x00, 0b101) => format!("{rd} = {rs1} >>u {rs2}"), // SRL
        (0x20, 0b101) => format!("{rd} = {rs1} >> {rs2}"), // SRA
        (0x00, 0b110) => format!("{rd} = {rs1} | {rs2}"), // OR
        (0x00, 0b111) => format!("{rd} = {rs1} & {rs2}"), // AND
        // M extension: encoded under the same OP opcode with funct7 = 0x01.
        (0x01, 0b000) => format!("{rd} = {rs1} * {rs2}"), // MUL
        (0x01, 0b001) => format!("{rd} = mulh({rs1}, {rs2})"), // MULH
        (0x01, 0b010) => format!("{rd} = mulhsu({rs1}, {rs2})"), // MULHSU
        (0x01, 0b011) => format!("{rd} = mulhu({rs1}, {rs2})"), // MULHU
        (0x01, 0b100) => format!("{rd} = {rs1} / {rs2}"), // DIV
        (0x01, 0b101) => format!("{rd} = {rs1} /u {rs2}"), // DIVU
        (0x01, 0b110) => format!("{rd} = {rs1} % {rs2}"), // REM
        (0x01, 0b111) => format!("{rd} = {rs1} %u {rs2}"), // REMU
        _ => "??? (fall-through)".to_string(),
    }
}

fn store(funct3: u8, rs1: u8, rs2: u8, imm: i64) -> String {
    let rs1 = reg(rs1);
    let rs2 = reg(rs2);
    let width = match funct3 {
        0b000 => "byte",
        0b001 => "half",
        0b010 => "word",
        _ => return "??? (fall-through)".to_string(),
    };
    format!("*({rs1} + {imm}) [{width}] = {rs2}")
}

fn branch(funct3: u8, rs1: u8, rs2: u8, imm: i64) -> String {
    let rs1 = reg(rs1);
    let rs2 = reg(rs2);
    let cond = match funct3 {
        0b000 => format!("{rs1} == {rs2}"),  // BEQ
        0b001 => format!("{rs1} != {rs2}"),  // BNE
        0b100 => format!("{rs1} < {rs2}"),   // BLT
        0b101 => format!("{rs1} >= {rs2}"),  // BGE
        0b110 => format!("{rs1} <u {rs2}"),  // BLTU
        0b111 => format!("{rs1} >=u {rs2}"), // BGEU
        _ => return "??? (fall-through)".to_string(),
    };
    format!("if ({cond}) pc = pc + {imm}")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::riscv::decode::decode;

    #[test]
    fn addi_prints_as_assignment() {
        let s = pretty_print(&decode(0x00800513)); // addi x10, x0, 8
        assert_eq!(s, "x10 = x0 + 8");
    }

    #[test]
    fn mul_prints_with_multiplication_operator() {
        let s = pretty_print(&decode(0x02B50533)); // mul x10, x10, x11
        assert_eq!(s, "x10 = x10 * x11");
    }

    #[test]
    fn jalr_return_prints_as_return() {
        let s = pretty_print(&decode(0x00008067)); // jalr x0, 0(x1)
        assert_eq!(s, "return");
    }

    #[test]
    fn jalr_non_return_prints_as_link_and_jump() {
        // jalr x5, 4(x6): rd=5, rs1=6, imm=4 — does not match the return special-case.
        let n: u32 = (4 << 20) | (6 << 15) | (0 << 12) | (5 << 7) | 0b1100111;
        let s = pretty_print(&decode(n));
        assert_eq!(s, "x5 = pc + 4; pc = x6 + 4");
    }

    #[test]
    fn negative_immediate_renders_signed() {
        let s = pretty_print(&decode(0xFFF10093)); // addi x1, x2, -1
        assert_eq!(s, "x1 = x2 + -1");
    }

    #[test]
    fn sltu_uses_unsigned_comparison_marker() {
        // sltu x5, x6, x7: opcode=OP, funct3=0b011, funct7=0
        let n = 0b0000000_00111_00110_011_00101_0110011u32;
        assert_eq!(pretty_print(&decode(n)), "x5 = (x6 <u x7)");
    }

    #[test]
    fn srl_uses_unsigned_shift_marker_while_sra_does_not() {
        // srl x5, x6, x7: funct7=0, funct3=0b101
        let srl = 0b0000000_00111_00110_101_00101_0110011u32;
        assert_eq!(pretty_print(&decode(srl)), "x5 = x6 >>u x7");
        // sra x5, x6, x7: funct7=0b0100000
        let sra = 0b0100000_00111_00110_101_00101_0110011u32;
        assert_eq!(pretty_print(&decode(sra)), "x5 = x6 >> x7");
    }

    #[test]
    fn opaque_instruction_prints_placeholder() {
        let n = 0b000000000000_00000_000_00000_1110011u32; // ecall (SYSTEM)
        assert_eq!(pretty_print(&decode(n)), "<unrecognized: System>");
    }

    #[test]
    fn load_mnemonic_varies_by_funct3() {
        // lb x5, 4(x6): funct3=000
        let lb: u32 = (4 << 20) | (6 << 15) | (0b000 << 12) | (5 << 7) | 0b0000011;
        assert_eq!(pretty_print(&decode(lb)), "x5 = LB(x6 + 4)");
        // lw x5, 4(x6): funct3=010
        let lw: u32 = (4 << 20) | (6 << 15) | (0b010 << 12) | (5 << 7) | 0b0000011;
        assert_eq!(pretty_print(&decode(lw)), "x5 = LW(x6 + 4)");
        // lbu x5, 4(x6): funct3=100
        let lbu: u32 = (4 << 20) | (6 << 15) | (0b100 << 12) | (5 << 7) | 0b0000011;
        assert_eq!(pretty_print(&decode(lbu)), "x5 = LBU(x6 + 4)");
    }

    #[test]
    fn unrecognized_op_imm_combination_prints_fallthrough_marker() {
        // funct3 is a 3-bit field in practice (0-7), all of which are
        // assigned; call the helper directly with an out-of-range value to
        // exercise the otherwise-dead fall-through arm.
        assert_eq!(op_imm(5, 0xFF, 6, 4), "??? (fall-through)");
    }

    #[test]
    fn unrecognized_op_combination_prints_fallthrough_marker() {
        // OP with a funct7 outside {0x00, 0x01, 0x20}, e.g. 0x10, has no
        // defined RV32I or M-extension meaning.
        assert_eq!(op(5, 0b000, 6, 7, 0x10), "??? (fall-through)");
    }

    #[test]
    fn unrecognized_load_width_prints_fallthrough_marker() {
        // funct3=110/111 are reserved for LOAD in RV32I.
        assert_eq!(load(5, 0b110, 6, 4), "??? (fall-through)");
    }

    #[test]
    fn unrecognized_store_width_prints_fallthrough_marker() {
        assert_eq!(store(0b101, 6, 7, 4), "??? (fall-through)");
    }

    #[test]
    fn unrecognized_branch_condition_prints_fallthrough_marker() {
        assert_eq!(branch(0b010, 6, 7, 4), "??? (fall-through)");
    }
}
