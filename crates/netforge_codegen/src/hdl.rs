//! Dialect-neutral HDL tree built by the emitters and consumed by the printer.
//!
//! Every primitive lowers into a handful of [`Decl`]s and [`Stmt`]s whose
//! leaves are [`Expr`]s. Nothing in this module knows about Verilog or VHDL
//! spelling; that lives in [`crate::vocab`] and [`crate::print`].

use netforge_netlist::{ArithOp, BitRange, ClockEdge, CompareOp, Parameter, PortGroup, SignalType};

/// Associative boolean operators. Negated gates wrap these in [`Expr::Not`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogicOp {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Exclusive or.
    Xor,
}

/// An expression appearing on the right-hand side of a statement.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    /// A named net.
    Net(String),
    /// A bit range of a named net.
    Slice {
        /// Base net name.
        net: String,
        /// Selected bits.
        range: BitRange,
    },
    /// A missing driver. `width` is `None` for struct-typed or unsized ports.
    Unconnected {
        /// Width of the port left dangling.
        width: Option<u32>,
    },
    /// A literal with explicit binary digits, most significant first.
    Bits(String),
    /// Every bit set to `bit`. `width` is `None` for struct types.
    Fill {
        /// The repeated bit value.
        bit: bool,
        /// Width of the filled value.
        width: Option<u32>,
    },
    /// A left-folded boolean expression.
    Logic {
        /// Operator between operands.
        op: LogicOp,
        /// Operands in order.
        operands: Vec<Expr>,
    },
    /// Bitwise complement.
    Not(Box<Expr>),
    /// A left-folded arithmetic expression producing `width` bits.
    Arith {
        /// Operator between operands.
        op: ArithOp,
        /// Operands in order.
        operands: Vec<Expr>,
        /// Operand and result width.
        width: u32,
    },
    /// A comparison producing a single bit.
    Compare {
        /// Comparison operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Operand width.
        width: u32,
    },
    /// Concatenation, most significant part first.
    Concat(Vec<Expr>),
    /// A word read from a memory array.
    Index {
        /// Array name.
        array: String,
        /// Address expression.
        index: Box<Expr>,
        /// Address width.
        index_width: u32,
    },
}

impl Expr {
    /// Shorthand for [`Expr::Net`].
    pub fn net(name: impl Into<String>) -> Self {
        Expr::Net(name.into())
    }

    /// An all-zero value of the given type.
    pub fn zero(ty: &SignalType) -> Self {
        Expr::Fill {
            bit: false,
            width: ty.width(),
        }
    }

    /// An all-ones value of the given type.
    pub fn ones(ty: &SignalType) -> Self {
        Expr::Fill {
            bit: true,
            width: ty.width(),
        }
    }

    /// Returns `true` if this expression is a missing driver.
    pub fn is_unconnected(&self) -> bool {
        matches!(self, Expr::Unconnected { .. })
    }

    /// Returns `true` if any part of this expression is a missing driver.
    pub fn has_unconnected(&self) -> bool {
        match self {
            Expr::Unconnected { .. } => true,
            Expr::Net(_) | Expr::Slice { .. } | Expr::Bits(_) | Expr::Fill { .. } => false,
            Expr::Logic { operands, .. } | Expr::Arith { operands, .. } | Expr::Concat(operands) => {
                operands.iter().any(Expr::has_unconnected)
            }
            Expr::Not(inner) => inner.has_unconnected(),
            Expr::Compare { lhs, rhs, .. } => lhs.has_unconnected() || rhs.has_unconnected(),
            Expr::Index { index, .. } => index.has_unconnected(),
        }
    }

    /// Appends the base names of all nets read by this expression, skipping
    /// names already present.
    pub fn collect_nets(&self, out: &mut Vec<String>) {
        let mut push = |name: &String| {
            if !out.contains(name) {
                out.push(name.clone());
            }
        };
        match self {
            Expr::Net(name) | Expr::Slice { net: name, .. } => push(name),
            Expr::Index { array, index, .. } => {
                push(array);
                index.collect_nets(out);
            }
            Expr::Unconnected { .. } | Expr::Bits(_) | Expr::Fill { .. } => {}
            Expr::Logic { operands, .. } | Expr::Arith { operands, .. } | Expr::Concat(operands) => {
                for operand in operands {
                    operand.collect_nets(out);
                }
            }
            Expr::Not(inner) => inner.collect_nets(out),
            Expr::Compare { lhs, rhs, .. } => {
                lhs.collect_nets(out);
                rhs.collect_nets(out);
            }
        }
    }
}

/// Whether a Verilog net is a continuous `wire` or a procedural `reg`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Storage {
    /// Driven by continuous assignment or an instance.
    Wire,
    /// Assigned inside an `always` block.
    Reg,
}

/// A declaration in the module body.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Decl {
    /// An internal net.
    Signal {
        /// Net name.
        name: String,
        /// Net type.
        ty: SignalType,
        /// Storage class.
        storage: Storage,
    },
    /// A memory array of `depth` words of `word_width` bits.
    Memory {
        /// Array name.
        name: String,
        /// Bits per word.
        word_width: u32,
        /// Number of words.
        depth: u64,
    },
}

impl Decl {
    /// The declared name.
    pub fn name(&self) -> &str {
        match self {
            Decl::Signal { name, .. } | Decl::Memory { name, .. } => name,
        }
    }
}

/// The destination of a clocked write.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Target {
    /// A whole net.
    Net(String),
    /// One word of a memory array.
    Element {
        /// Array name.
        array: String,
        /// Address expression.
        index: Expr,
        /// Address width.
        index_width: u32,
    },
}

/// A non-blocking write inside a clocked block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Write {
    /// Destination.
    pub target: Target,
    /// Written value.
    pub value: Expr,
}

impl Write {
    /// A write to a whole net.
    pub fn net(target: impl Into<String>, value: Expr) -> Self {
        Self {
            target: Target::Net(target.into()),
            value,
        }
    }
}

/// A reset branch of a clocked block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResetBranch {
    /// Reset signal.
    pub signal: Expr,
    /// `Rising` means active high, `Falling` active low.
    pub polarity: ClockEdge,
    /// Writes performed while reset is active.
    pub writes: Vec<Write>,
}

/// An edge-triggered block.
///
/// Priority inside the block: asynchronous reset, then synchronous reset,
/// then the guarded capture.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClockedBlock {
    /// Clock signal.
    pub clock: Expr,
    /// Active clock edge.
    pub edge: ClockEdge,
    /// Reset acting outside the clock edge; also listed in the sensitivity list.
    pub async_reset: Option<ResetBranch>,
    /// Reset sampled on the clock edge.
    pub sync_reset: Option<ResetBranch>,
    /// Condition gating the capture writes (enable, write enable).
    pub guard: Option<Expr>,
    /// Writes performed on the clock edge.
    pub writes: Vec<Write>,
}

/// One arm of a combinational case block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CaseArm {
    /// Binary label digits.
    pub label: String,
    /// Value assigned when the selector equals the label.
    pub value: Expr,
}

/// One named connection of an instance.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PortMap {
    /// Formal port name on the instantiated module.
    pub port: String,
    /// Direction of the formal port.
    pub direction: PortGroup,
    /// Connected expression, or `None` for an output left open.
    pub actual: Option<Expr>,
}

/// A structural instantiation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instance {
    /// Instantiated module/entity name.
    pub module: String,
    /// Instance label.
    pub name: String,
    /// Parameter/generic overrides.
    pub parameters: Vec<Parameter>,
    /// Port map entries: inputs first, then outputs.
    pub connections: Vec<PortMap>,
}

/// A concurrent statement in the module body.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Stmt {
    /// Continuous assignment `target = value`.
    Assign {
        /// Assigned net.
        target: String,
        /// Assigned value.
        value: Expr,
    },
    /// Two-way selection `target = cond ? then : otherwise`.
    Select {
        /// Assigned net.
        target: String,
        /// Single-bit condition.
        cond: Expr,
        /// Value when the condition is 1.
        then: Expr,
        /// Value when the condition is 0.
        otherwise: Expr,
    },
    /// Combinational case block.
    Case {
        /// Assigned net.
        target: String,
        /// Case selector.
        selector: Expr,
        /// Arms in label order.
        arms: Vec<CaseArm>,
        /// Value for every other selector value.
        default: Expr,
    },
    /// Edge-triggered block.
    Clocked(ClockedBlock),
    /// Sub-module instantiation.
    Instance(Instance),
}

impl Stmt {
    /// Returns `true` for statements printed over several lines.
    pub fn is_block(&self) -> bool {
        matches!(self, Stmt::Case { .. } | Stmt::Clocked(_) | Stmt::Instance(_))
    }

    /// Nets this statement assigns from inside a procedural block.
    pub fn procedural_targets(&self) -> Vec<&str> {
        match self {
            Stmt::Case { target, .. } => vec![target.as_str()],
            Stmt::Clocked(block) => {
                let resets = block.async_reset.iter().chain(block.sync_reset.iter());
                resets
                    .flat_map(|r| r.writes.iter())
                    .chain(block.writes.iter())
                    .filter_map(|w| match &w.target {
                        Target::Net(name) => Some(name.as_str()),
                        Target::Element { .. } => None,
                    })
                    .fold(Vec::new(), |mut acc, name| {
                        if !acc.contains(&name) {
                            acc.push(name);
                        }
                        acc
                    })
            }
            Stmt::Assign { .. } | Stmt::Select { .. } | Stmt::Instance(_) => Vec::new(),
        }
    }
}

/// A module-level port.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModulePort {
    /// Port name.
    pub name: String,
    /// Direction.
    pub direction: PortGroup,
    /// Port type.
    pub ty: SignalType,
    /// Storage class (outputs assigned procedurally are `Reg`).
    pub storage: Storage,
}

/// A complete module ready for printing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Module {
    /// Module/entity name.
    pub name: String,
    /// Ports: inputs first, then outputs.
    pub ports: Vec<ModulePort>,
    /// Struct packages referenced anywhere in the module, sorted.
    pub packages: Vec<String>,
    /// Body declarations.
    pub decls: Vec<Decl>,
    /// Body statements.
    pub stmts: Vec<Stmt>,
}
