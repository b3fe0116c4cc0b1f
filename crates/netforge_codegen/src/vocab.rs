//! Per-dialect spelling of keywords, operators, ranges and literals.

use crate::hdl::LogicOp;
use netforge_config::Dialect;
use netforge_netlist::{ArithOp, CompareOp};

/// Surface vocabulary of one HDL dialect.
///
/// The printer is shared between dialects; everything that is a pure
/// substitution of one token for another lives here. Block structure that
/// differs in shape (process vs. always) is handled by the printer itself.
#[derive(Debug)]
pub struct Vocabulary {
    /// Line comment leader.
    pub comment: &'static str,
    /// Marker attached to placeholders for missing drivers.
    pub unconnected: &'static str,
    /// Operator assigning a net outside processes.
    pub assign: &'static str,
    /// Operator assigning inside clocked blocks.
    pub nonblocking: &'static str,
    /// Operator assigning inside combinational blocks.
    pub blocking: &'static str,
    /// Opening bracket of a bit range.
    pub range_open: &'static str,
    /// Separator between the high and low bit of a range.
    pub range_sep: &'static str,
    /// Closing bracket of a bit range.
    pub range_close: &'static str,
    /// Opening of a concatenation.
    pub concat_open: &'static str,
    /// Separator between concatenated parts.
    pub concat_sep: &'static str,
    /// Closing of a concatenation.
    pub concat_close: &'static str,
    /// Bitwise complement prefix.
    pub not: &'static str,
    and: &'static str,
    or: &'static str,
    xor: &'static str,
    add: &'static str,
    sub: &'static str,
    mul: &'static str,
    div: &'static str,
    rem: &'static str,
    gt: &'static str,
    lt: &'static str,
    ge: &'static str,
    le: &'static str,
    eq: &'static str,
    ne: &'static str,
}

const VERILOG: Vocabulary = Vocabulary {
    comment: "//",
    unconnected: "/* unconnected */",
    assign: "=",
    nonblocking: "<=",
    blocking: "=",
    range_open: "[",
    range_sep: ":",
    range_close: "]",
    concat_open: "{",
    concat_sep: ", ",
    concat_close: "}",
    not: "~",
    and: "&",
    or: "|",
    xor: "^",
    add: "+",
    sub: "-",
    mul: "*",
    div: "/",
    rem: "%",
    gt: ">",
    lt: "<",
    ge: ">=",
    le: "<=",
    eq: "==",
    ne: "!=",
};

const VHDL: Vocabulary = Vocabulary {
    comment: "--",
    unconnected: "-- unconnected",
    assign: "<=",
    nonblocking: "<=",
    blocking: "<=",
    range_open: "(",
    range_sep: " downto ",
    range_close: ")",
    concat_open: "",
    concat_sep: " & ",
    concat_close: "",
    not: "not ",
    and: "and",
    or: "or",
    xor: "xor",
    add: "+",
    sub: "-",
    mul: "*",
    div: "/",
    rem: "mod",
    gt: ">",
    lt: "<",
    ge: ">=",
    le: "<=",
    eq: "=",
    ne: "/=",
};

impl Vocabulary {
    /// The vocabulary of a dialect.
    pub fn of(dialect: Dialect) -> &'static Vocabulary {
        match dialect {
            Dialect::Verilog => &VERILOG,
            Dialect::Vhdl => &VHDL,
        }
    }

    /// Spelling of a boolean operator.
    pub fn logic(&self, op: LogicOp) -> &'static str {
        match op {
            LogicOp::And => self.and,
            LogicOp::Or => self.or,
            LogicOp::Xor => self.xor,
        }
    }

    /// Spelling of an arithmetic operator.
    pub fn arith(&self, op: ArithOp) -> &'static str {
        match op {
            ArithOp::Add => self.add,
            ArithOp::Sub => self.sub,
            ArithOp::Mul => self.mul,
            ArithOp::Div => self.div,
            ArithOp::Mod => self.rem,
        }
    }

    /// Spelling of a comparison operator.
    pub fn compare(&self, op: CompareOp) -> &'static str {
        match op {
            CompareOp::Gt => self.gt,
            CompareOp::Lt => self.lt,
            CompareOp::Ge => self.ge,
            CompareOp::Le => self.le,
            CompareOp::Eq => self.eq,
            CompareOp::Ne => self.ne,
        }
    }

    /// A bit range `hi..lo`; a single bit when both ends coincide.
    pub fn range(&self, hi: u32, lo: u32) -> String {
        if hi == lo {
            format!("{}{hi}{}", self.range_open, self.range_close)
        } else {
            format!("{}{hi}{}{lo}{}", self.range_open, self.range_sep, self.range_close)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inequality_spelling_differs() {
        assert_eq!(Vocabulary::of(Dialect::Verilog).compare(CompareOp::Ne), "!=");
        assert_eq!(Vocabulary::of(Dialect::Vhdl).compare(CompareOp::Ne), "/=");
    }

    #[test]
    fn remainder_spelling_differs() {
        assert_eq!(Vocabulary::of(Dialect::Verilog).arith(ArithOp::Mod), "%");
        assert_eq!(Vocabulary::of(Dialect::Vhdl).arith(ArithOp::Mod), "mod");
    }

    #[test]
    fn ranges() {
        let v = Vocabulary::of(Dialect::Verilog);
        assert_eq!(v.range(7, 4), "[7:4]");
        assert_eq!(v.range(3, 3), "[3]");
        let h = Vocabulary::of(Dialect::Vhdl);
        assert_eq!(h.range(7, 0), "(7 downto 0)");
        assert_eq!(h.range(0, 0), "(0)");
    }
}
