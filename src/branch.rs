//! Branch condition resolution

use std::fmt;

/// Conditional branch kinds in rv32i
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BranchKind {
    #[default]
    BEQ,
    BNE,
    BLT,
    BGE,
    BLTU,
    BGEU,
}

impl BranchKind {
    /// Maps a BRANCH funct3 to its kind
    pub fn from_funct3(funct3: u32) -> Option<Self> {
        match funct3 {
            0b000 => Some(BranchKind::BEQ),
            0b001 => Some(BranchKind::BNE),
            0b100 => Some(BranchKind::BLT),
            0b101 => Some(BranchKind::BGE),
            0b110 => Some(BranchKind::BLTU),
            0b111 => Some(BranchKind::BGEU),
            _ => None,
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchKind::BEQ => "beq",
            BranchKind::BNE => "bne",
            BranchKind::BLT => "blt",
            BranchKind::BGE => "bge",
            BranchKind::BLTU => "bltu",
            BranchKind::BGEU => "bgeu",
        };
        f.write_str(name)
    }
}

/// Returns true iff the branch is taken
pub fn evaluate(a: u32, b: u32, kind: BranchKind) -> bool {
    match kind {
        BranchKind::BEQ => a == b,
        BranchKind::BNE => a != b,
        BranchKind::BLT => (a as i32) < (b as i32),
        BranchKind::BGE => (a as i32) >= (b as i32),
        BranchKind::BLTU => a < b,
        BranchKind::BGEU => a >= b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality() {
        assert!(evaluate(3, 3, BranchKind::BEQ));
        assert!(!evaluate(3, 4, BranchKind::BEQ));
        assert!(evaluate(3, 4, BranchKind::BNE));
        assert!(!evaluate(0, 0, BranchKind::BNE));
    }

    #[test]
    fn test_signed_vs_unsigned() {
        let minus_one = 0xffff_ffff;
        assert!(evaluate(minus_one, 1, BranchKind::BLT));
        assert!(!evaluate(minus_one, 1, BranchKind::BLTU));
        assert!(!evaluate(minus_one, 1, BranchKind::BGE));
        assert!(evaluate(minus_one, 1, BranchKind::BGEU));
    }

    #[test]
    fn test_ge_includes_equal() {
        assert!(evaluate(7, 7, BranchKind::BGE));
        assert!(evaluate(7, 7, BranchKind::BGEU));
        assert!(!evaluate(7, 7, BranchKind::BLT));
        assert!(!evaluate(7, 7, BranchKind::BLTU));
    }

    #[test]
    fn test_from_funct3() {
        assert_eq!(BranchKind::from_funct3(0b000), Some(BranchKind::BEQ));
        assert_eq!(BranchKind::from_funct3(0b111), Some(BranchKind::BGEU));
        assert_eq!(BranchKind::from_funct3(0b010), None);
        assert_eq!(BranchKind::from_funct3(0b011), None);
    }
}
