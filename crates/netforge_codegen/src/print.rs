//! Renders an assembled [`Module`] as Verilog or VHDL text.

use crate::hdl::{
    CaseArm, ClockedBlock, Decl, Expr, Instance, Module, ModulePort, ResetBranch, Stmt, Storage,
    Target, Write,
};
use crate::vocab::Vocabulary;
use netforge_config::Dialect;
use netforge_netlist::{ClockEdge, PortGroup, SignalType};

/// Text emitted on the first line when a header is requested.
pub const HEADER: &str = "Generated by netforge. Do not edit.";

/// One arm of an if/else-if chain: an optional condition and its writes.
type Branch<'b> = (Option<String>, &'b [Write]);

/// Accumulates the text of one module.
pub struct Printer {
    dialect: Dialect,
    vocab: &'static Vocabulary,
    indent: usize,
    out: String,
}

impl Printer {
    /// Creates a printer indenting by `indent` spaces per level.
    pub fn new(dialect: Dialect, indent: usize) -> Self {
        Self {
            dialect,
            vocab: Vocabulary::of(dialect),
            indent,
            out: String::new(),
        }
    }

    /// Prints a whole module and returns the text.
    pub fn print(mut self, module: &Module, header: bool) -> String {
        if header {
            let line = format!("{} {HEADER}", self.vocab.comment);
            self.line(0, &line);
            if self.dialect == Dialect::Verilog {
                self.blank();
            }
        }
        match self.dialect {
            Dialect::Verilog => self.verilog_module(module),
            Dialect::Vhdl => self.vhdl_module(module),
        }
        self.out
    }

    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level * self.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Appends the placeholder marker to a VHDL line whose expression
    /// contains a missing driver. Verilog carries the marker inline.
    fn marked(&self, text: String, unconnected: bool) -> String {
        if unconnected && self.dialect == Dialect::Vhdl {
            format!("{text}  {}", self.vocab.unconnected)
        } else {
            text
        }
    }

    fn statements(&mut self, level: usize, stmts: &[Stmt]) {
        let mut prev_block = false;
        for (i, stmt) in stmts.iter().enumerate() {
            if i > 0 && (prev_block || stmt.is_block()) {
                self.blank();
            }
            prev_block = stmt.is_block();
            match stmt {
                Stmt::Assign { target, value } => self.assign(level, target, value),
                Stmt::Select {
                    target,
                    cond,
                    then,
                    otherwise,
                } => self.select(level, target, cond, then, otherwise),
                Stmt::Case {
                    target,
                    selector,
                    arms,
                    default,
                } => self.case(level, target, selector, arms, default),
                Stmt::Clocked(block) => self.clocked(level, block),
                Stmt::Instance(inst) => self.instance(level, inst),
            }
        }
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    /// Renders an expression in operand position.
    pub fn expr(&self, expr: &Expr) -> String {
        let v = self.vocab;
        match (self.dialect, expr) {
            (_, Expr::Net(name)) => name.clone(),
            (_, Expr::Slice { net, range }) => format!("{net}{}", v.range(range.hi, range.lo)),
            (Dialect::Verilog, Expr::Unconnected { width }) => match width {
                Some(w) => format!("{w}'b0 {}", v.unconnected),
                None => format!("'0 {}", v.unconnected),
            },
            (Dialect::Vhdl, Expr::Unconnected { width }) => match width {
                Some(1) => "'0'".to_string(),
                Some(w) => format!("std_logic_vector(to_unsigned(0, {w}))"),
                None => "(others => '0')".to_string(),
            },
            (Dialect::Verilog, Expr::Bits(digits)) => format!("{}'b{digits}", digits.len()),
            (Dialect::Vhdl, Expr::Bits(digits)) if digits.len() == 1 => format!("'{digits}'"),
            (Dialect::Vhdl, Expr::Bits(digits)) => format!("\"{digits}\""),
            (Dialect::Verilog, Expr::Fill { bit, width }) => {
                let b = u8::from(*bit);
                match width {
                    Some(1) => format!("1'b{b}"),
                    Some(w) if *bit => format!("{{{w}{{1'b1}}}}"),
                    Some(w) => format!("{w}'b0"),
                    None => format!("'{b}"),
                }
            }
            (Dialect::Vhdl, Expr::Fill { bit, width }) => {
                let b = u8::from(*bit);
                match width {
                    Some(1) => format!("'{b}'"),
                    _ => format!("(others => '{b}')"),
                }
            }
            (_, Expr::Logic { op, operands }) => operands
                .iter()
                .map(|e| self.operand(e))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", v.logic(*op))),
            (_, Expr::Not(inner)) => format!("{}{}", v.not, self.operand(inner)),
            (Dialect::Verilog, Expr::Arith { op, operands, .. }) => operands
                .iter()
                .map(|e| self.operand(e))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", v.arith(*op))),
            (Dialect::Vhdl, Expr::Arith { op, operands, width }) => {
                let folded = operands
                    .iter()
                    .map(|e| self.unsigned(e, *width))
                    .collect::<Vec<_>>()
                    .join(&format!(" {} ", v.arith(*op)));
                format!("std_logic_vector(resize({folded}, {width}))")
            }
            (Dialect::Verilog, Expr::Compare { op, lhs, rhs, .. }) => format!(
                "{} {} {}",
                self.operand(lhs),
                v.compare(*op),
                self.operand(rhs)
            ),
            (Dialect::Vhdl, Expr::Compare { op, lhs, rhs, width }) => format!(
                "{} {} {}",
                self.unsigned(lhs, *width),
                v.compare(*op),
                self.unsigned(rhs, *width)
            ),
            (_, Expr::Concat(parts)) => format!(
                "{}{}{}",
                v.concat_open,
                parts
                    .iter()
                    .map(|e| self.operand(e))
                    .collect::<Vec<_>>()
                    .join(v.concat_sep),
                v.concat_close
            ),
            (Dialect::Verilog, Expr::Index { array, index, .. }) => {
                format!("{array}[{}]", self.expr(index))
            }
            (Dialect::Vhdl, Expr::Index {
                array,
                index,
                index_width,
            }) => format!("{array}({})", self.vhdl_integer(index, *index_width)),
        }
    }

    /// Renders an expression on the right-hand side of an assignment, where
    /// VHDL can size an aggregate from the target.
    fn rhs(&self, expr: &Expr) -> String {
        match (self.dialect, expr) {
            (Dialect::Vhdl, Expr::Unconnected { width }) if *width != Some(1) => {
                "(others => '0')".to_string()
            }
            _ => self.expr(expr),
        }
    }

    /// Renders a sub-expression, parenthesized when it is itself an operator.
    fn operand(&self, expr: &Expr) -> String {
        match expr {
            Expr::Logic { operands, .. } | Expr::Arith { operands, .. } if operands.len() > 1 => {
                format!("({})", self.expr(expr))
            }
            Expr::Compare { .. } => format!("({})", self.expr(expr)),
            _ => self.expr(expr),
        }
    }

    /// A VHDL `unsigned` view of a `width`-bit operand.
    fn unsigned(&self, expr: &Expr, width: u32) -> String {
        match expr {
            Expr::Unconnected { .. } | Expr::Fill { bit: false, .. } => {
                format!("to_unsigned(0, {width})")
            }
            _ if width == 1 => format!("unsigned'(0 => {})", self.expr(expr)),
            _ => format!("unsigned({})", self.expr(expr)),
        }
    }

    fn vhdl_integer(&self, expr: &Expr, width: u32) -> String {
        match expr {
            Expr::Unconnected { .. } => "0".to_string(),
            _ => format!("to_integer({})", self.unsigned(expr, width)),
        }
    }

    /// A single-bit condition, true when `expr` is at its active level.
    fn condition(&self, expr: &Expr, active_high: bool) -> String {
        let e = self.expr(expr);
        match (self.dialect, active_high) {
            (Dialect::Verilog, true) => e,
            (Dialect::Verilog, false) => format!("!{}", self.operand(expr)),
            (Dialect::Vhdl, true) => format!("{e} = '1'"),
            (Dialect::Vhdl, false) => format!("{e} = '0'"),
        }
    }

    fn target(&self, target: &Target) -> String {
        match target {
            Target::Net(name) => name.clone(),
            Target::Element {
                array,
                index,
                index_width,
            } => self.expr(&Expr::Index {
                array: array.clone(),
                index: Box::new(index.clone()),
                index_width: *index_width,
            }),
        }
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn assign(&mut self, level: usize, target: &str, value: &Expr) {
        let text = match (self.dialect, value) {
            (Dialect::Verilog, _) => format!("assign {target} = {};", self.expr(value)),
            (Dialect::Vhdl, Expr::Compare { .. }) => {
                format!("{target} <= '1' when {} else '0';", self.expr(value))
            }
            (Dialect::Vhdl, _) => format!("{target} <= {};", self.rhs(value)),
        };
        let text = self.marked(text, value.has_unconnected());
        self.line(level, &text);
    }

    fn select(&mut self, level: usize, target: &str, cond: &Expr, then: &Expr, otherwise: &Expr) {
        let text = match self.dialect {
            Dialect::Verilog => format!(
                "assign {target} = {} ? {} : {};",
                self.operand(cond),
                self.expr(then),
                self.expr(otherwise)
            ),
            Dialect::Vhdl => format!(
                "{target} <= {} when {} else {};",
                self.rhs(then),
                self.condition(cond, true),
                self.rhs(otherwise)
            ),
        };
        let unconnected =
            cond.has_unconnected() || then.has_unconnected() || otherwise.has_unconnected();
        let text = self.marked(text, unconnected);
        self.line(level, &text);
    }

    fn case(&mut self, level: usize, target: &str, selector: &Expr, arms: &[CaseArm], default: &Expr) {
        let assign = self.vocab.blocking;
        match self.dialect {
            Dialect::Verilog => {
                self.line(level, "always @(*) begin");
                let head = format!("case ({})", self.expr(selector));
                self.line(level + 1, &head);
                for arm in arms {
                    let label = self.expr(&Expr::Bits(arm.label.clone()));
                    let text = format!("{label}: {target} {assign} {};", self.expr(&arm.value));
                    self.line(level + 2, &text);
                }
                let text = format!("default: {target} {assign} {};", self.expr(default));
                self.line(level + 2, &text);
                self.line(level + 1, "endcase");
                self.line(level, "end");
            }
            Dialect::Vhdl => {
                let mut nets = Vec::new();
                selector.collect_nets(&mut nets);
                for arm in arms {
                    arm.value.collect_nets(&mut nets);
                }
                default.collect_nets(&mut nets);
                self.process_head(level, &nets);
                let head = format!("case {} is", self.expr(selector));
                let head = self.marked(head, selector.has_unconnected());
                self.line(level + 1, &head);
                for arm in arms {
                    let label = self.expr(&Expr::Bits(arm.label.clone()));
                    let text = format!("when {label} => {target} {assign} {};", self.rhs(&arm.value));
                    let text = self.marked(text, arm.value.has_unconnected());
                    self.line(level + 2, &text);
                }
                let text = format!("when others => {target} {assign} {};", self.rhs(default));
                self.line(level + 2, &text);
                self.line(level + 1, "end case;");
                self.line(level, "end process;");
            }
        }
    }

    fn process_head(&mut self, level: usize, nets: &[String]) {
        let list = if nets.is_empty() {
            "all".to_string()
        } else {
            nets.join(", ")
        };
        self.line(level, &format!("process ({list})"));
        self.line(level, "begin");
    }

    fn writes(&mut self, level: usize, writes: &[Write]) {
        for write in writes {
            let text = format!(
                "{} {} {};",
                self.target(&write.target),
                self.vocab.nonblocking,
                self.rhs(&write.value)
            );
            let unconnected = write.value.has_unconnected()
                || matches!(&write.target, Target::Element { index, .. } if index.has_unconnected());
            let text = self.marked(text, unconnected);
            self.line(level, &text);
        }
    }

    /// Prints an if/else-if chain. A lone unconditional branch is printed
    /// without any `if`.
    fn chain(&mut self, level: usize, branches: &[Branch<'_>]) {
        if let [(None, writes)] = branches {
            self.writes(level, writes);
            return;
        }
        for (i, (cond, writes)) in branches.iter().enumerate() {
            let head = match (self.dialect, i, cond) {
                (Dialect::Verilog, 0, Some(c)) => format!("if ({c}) begin"),
                (Dialect::Verilog, _, Some(c)) => format!("end else if ({c}) begin"),
                (Dialect::Verilog, _, None) => "end else begin".to_string(),
                (Dialect::Vhdl, 0, Some(c)) => format!("if {c} then"),
                (Dialect::Vhdl, _, Some(c)) => format!("elsif {c} then"),
                (Dialect::Vhdl, _, None) => "else".to_string(),
            };
            self.line(level, &head);
            self.writes(level + 1, writes);
        }
        let tail = match self.dialect {
            Dialect::Verilog => "end",
            Dialect::Vhdl => "end if;",
        };
        self.line(level, tail);
    }

    fn clocked(&mut self, level: usize, block: &ClockedBlock) {
        let reset_cond = |r: &ResetBranch| {
            self.condition(&r.signal, r.polarity == ClockEdge::Rising)
        };
        let mut inner: Vec<Branch<'_>> = Vec::new();
        if let Some(reset) = &block.sync_reset {
            inner.push((Some(reset_cond(reset)), reset.writes.as_slice()));
        }
        let guard = block.guard.as_ref().map(|g| self.condition(g, true));
        inner.push((guard, block.writes.as_slice()));
        let outer = block
            .async_reset
            .as_ref()
            .map(|reset| (reset_cond(reset), reset));

        match self.dialect {
            Dialect::Verilog => {
                let mut events = vec![format!(
                    "{} {}",
                    verilog_edge(block.edge),
                    self.expr(&block.clock)
                )];
                if let Some((_, reset)) = &outer {
                    events.push(format!(
                        "{} {}",
                        verilog_edge(reset.polarity),
                        self.expr(&reset.signal)
                    ));
                }
                self.line(level, &format!("always @({}) begin", events.join(" or ")));
                let mut branches: Vec<Branch<'_>> = Vec::new();
                if let Some((cond, reset)) = &outer {
                    branches.push((Some(cond.clone()), reset.writes.as_slice()));
                }
                branches.extend(inner);
                self.chain(level + 1, &branches);
                self.line(level, "end");
            }
            Dialect::Vhdl => {
                let mut nets = Vec::new();
                block.clock.collect_nets(&mut nets);
                if let Some((_, reset)) = &outer {
                    reset.signal.collect_nets(&mut nets);
                }
                self.process_head(level, &nets);
                let edge = format!("{}({})", vhdl_edge(block.edge), self.expr(&block.clock));
                match &outer {
                    Some((cond, reset)) => {
                        self.line(level + 1, &format!("if {cond} then"));
                        self.writes(level + 2, &reset.writes);
                        self.line(level + 1, &format!("elsif {edge} then"));
                    }
                    None => self.line(level + 1, &format!("if {edge} then")),
                }
                self.chain(level + 2, &inner);
                self.line(level + 1, "end if;");
                self.line(level, "end process;");
            }
        }
    }

    fn instance(&mut self, level: usize, inst: &Instance) {
        match self.dialect {
            Dialect::Verilog => self.verilog_instance(level, inst),
            Dialect::Vhdl => self.vhdl_instance(level, inst),
        }
    }

    fn verilog_instance(&mut self, level: usize, inst: &Instance) {
        let mut head = inst.module.clone();
        if !inst.parameters.is_empty() {
            self.line(level, &format!("{head} #("));
            let count = inst.parameters.len();
            for (i, p) in inst.parameters.iter().enumerate() {
                let sep = if i + 1 < count { "," } else { "" };
                self.line(level + 1, &format!(".{}({}){sep}", p.name, p.value));
            }
            head = ")".to_string();
        }
        if inst.connections.is_empty() {
            self.line(level, &format!("{head} {} ();", inst.name));
            return;
        }
        self.line(level, &format!("{head} {} (", inst.name));
        let count = inst.connections.len();
        for (i, conn) in inst.connections.iter().enumerate() {
            let sep = if i + 1 < count { "," } else { "" };
            let actual = match &conn.actual {
                Some(Expr::Unconnected { .. }) | None => self.vocab.unconnected.to_string(),
                Some(expr) => self.expr(expr),
            };
            self.line(level + 1, &format!(".{}({actual}){sep}", conn.port));
        }
        self.line(level, ");");
    }

    fn vhdl_instance(&mut self, level: usize, inst: &Instance) {
        let mut trailer = "";
        if inst.connections.is_empty() && inst.parameters.is_empty() {
            trailer = ";";
        }
        self.line(
            level,
            &format!("{} : entity work.{}{trailer}", inst.name, inst.module),
        );
        if !inst.parameters.is_empty() {
            self.line(level + 1, "generic map (");
            let count = inst.parameters.len();
            for (i, p) in inst.parameters.iter().enumerate() {
                let sep = if i + 1 < count { "," } else { "" };
                self.line(level + 2, &format!("{} => {}{sep}", p.name, p.value));
            }
            let close = if inst.connections.is_empty() { ");" } else { ")" };
            self.line(level + 1, close);
        }
        if inst.connections.is_empty() {
            return;
        }
        self.line(level + 1, "port map (");
        let count = inst.connections.len();
        for (i, conn) in inst.connections.iter().enumerate() {
            let sep = if i + 1 < count { "," } else { "" };
            let (actual, unconnected) = match (&conn.actual, conn.direction) {
                (None, _) | (Some(Expr::Unconnected { .. }), PortGroup::Output) => {
                    ("open".to_string(), false)
                }
                (Some(expr), _) => (self.rhs(expr), expr.has_unconnected()),
            };
            let text = self.marked(format!("{} => {actual}{sep}", conn.port), unconnected);
            self.line(level + 2, &text);
        }
        self.line(level + 1, ");");
    }

    // ---------------------------------------------------------------
    // Module frames
    // ---------------------------------------------------------------

    fn verilog_type(ty: &SignalType) -> String {
        match ty {
            SignalType::Bits(1) => String::new(),
            SignalType::Bits(w) => format!("[{}:0] ", w.saturating_sub(1)),
            SignalType::Struct(st) => format!("{}::{} ", st.package, st.type_name),
        }
    }

    fn verilog_port(port: &ModulePort) -> String {
        let direction = match port.direction {
            PortGroup::Input => "input",
            PortGroup::Output => "output",
        };
        let storage = match (&port.ty, port.storage) {
            (SignalType::Bits(_), Storage::Reg) => "reg ",
            _ => "",
        };
        format!(
            "{direction} {storage}{}{}",
            Self::verilog_type(&port.ty),
            port.name
        )
    }

    fn verilog_decl(decl: &Decl) -> String {
        match decl {
            Decl::Signal {
                name,
                ty: ty @ SignalType::Struct(_),
                ..
            } => format!("{}{name};", Self::verilog_type(ty)),
            Decl::Signal { name, ty, storage } => {
                let keyword = match storage {
                    Storage::Wire => "wire",
                    Storage::Reg => "reg",
                };
                format!("{keyword} {}{name};", Self::verilog_type(ty))
            }
            Decl::Memory {
                name,
                word_width,
                depth,
            } => format!(
                "reg {}{name} [0:{}];",
                Self::verilog_type(&SignalType::Bits(*word_width)),
                depth.saturating_sub(1)
            ),
        }
    }

    fn verilog_module(&mut self, module: &Module) {
        if module.ports.is_empty() {
            self.line(0, &format!("module {};", module.name));
        } else {
            self.line(0, &format!("module {} (", module.name));
            let count = module.ports.len();
            for (i, port) in module.ports.iter().enumerate() {
                let sep = if i + 1 < count { "," } else { "" };
                self.line(1, &format!("{}{sep}", Self::verilog_port(port)));
            }
            self.line(0, ");");
        }
        if !module.decls.is_empty() {
            self.blank();
            for decl in &module.decls {
                self.line(1, &Self::verilog_decl(decl));
            }
        }
        if !module.stmts.is_empty() {
            self.blank();
            self.statements(1, &module.stmts);
        }
        self.blank();
        self.line(0, "endmodule");
    }

    fn vhdl_type(ty: &SignalType) -> String {
        match ty {
            SignalType::Bits(1) => "std_logic".to_string(),
            SignalType::Bits(w) => {
                format!("std_logic_vector({} downto 0)", w.saturating_sub(1))
            }
            SignalType::Struct(st) => st.type_name.clone(),
        }
    }

    fn vhdl_module(&mut self, module: &Module) {
        self.line(0, "library ieee;");
        self.line(0, "use ieee.std_logic_1164.all;");
        self.line(0, "use ieee.numeric_std.all;");
        for package in &module.packages {
            self.line(0, &format!("use work.{package}.all;"));
        }
        self.blank();

        self.line(0, &format!("entity {} is", module.name));
        if !module.ports.is_empty() {
            self.line(1, "port (");
            let count = module.ports.len();
            for (i, port) in module.ports.iter().enumerate() {
                let sep = if i + 1 < count { ";" } else { "" };
                let mode = match port.direction {
                    PortGroup::Input => "in",
                    PortGroup::Output => "out",
                };
                let text = format!("{} : {mode} {}{sep}", port.name, Self::vhdl_type(&port.ty));
                self.line(2, &text);
            }
            self.line(1, ");");
        }
        self.line(0, &format!("end entity {};", module.name));
        self.blank();

        self.line(0, &format!("architecture rtl of {} is", module.name));
        for decl in &module.decls {
            match decl {
                Decl::Signal { name, ty, .. } => {
                    self.line(1, &format!("signal {name} : {};", Self::vhdl_type(ty)));
                }
                Decl::Memory {
                    name,
                    word_width,
                    depth,
                } => {
                    let word = Self::vhdl_type(&SignalType::Bits(*word_width));
                    let text = format!(
                        "type {name}_t is array (0 to {}) of {word};",
                        depth.saturating_sub(1)
                    );
                    self.line(1, &text);
                    self.line(1, &format!("signal {name} : {name}_t;"));
                }
            }
        }
        self.line(0, "begin");
        self.statements(1, &module.stmts);
        self.line(0, "end architecture rtl;");
    }
}

fn verilog_edge(edge: ClockEdge) -> &'static str {
    match edge {
        ClockEdge::Rising => "posedge",
        ClockEdge::Falling => "negedge",
    }
}

fn vhdl_edge(edge: ClockEdge) -> &'static str {
    match edge {
        ClockEdge::Rising => "rising_edge",
        ClockEdge::Falling => "falling_edge",
    }
}
