//! ALU implementation

/// Performs an atomic ALU operation.
/// Returns the result and the zero flag.
pub fn compute(a: u32, b: u32, op: ALUOp) -> (u32, bool) {
    let shamt = b & 0x1f;
    let result = match op {
        ALUOp::ADD => a.wrapping_add(b),
        ALUOp::SUB => a.wrapping_sub(b),
        ALUOp::AND => a & b,
        ALUOp::OR => a | b,
        ALUOp::XOR => a ^ b,
        ALUOp::SLL => a << shamt,
        ALUOp::SRL => a >> shamt,
        ALUOp::SRA => ((a as i32) >> shamt) as u32,
        ALUOp::SLT => ((a as i32) < (b as i32)) as u32,
        ALUOp::SLTU => (a < b) as u32,
    };
    (result, result == 0)
}

/// Selector for ALU src2 input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ALUSrc {
    // From register
    #[default]
    REG,
    // From immediate
    IMM,
}

/// Set of ALU operations needed for rv32i
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ALUOp {
    // Arithmetic
    #[default]
    ADD,
    SUB,
    // Logical
    AND,
    OR,
    XOR,
    // Set
    SLT,
    SLTU,
    // Shift
    SLL,
    SRL,
    SRA,
}
