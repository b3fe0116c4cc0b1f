//! Statement emitters: one lowering rule per primitive kind.

use crate::classify::Buckets;
use crate::decl::{inverted_net, memory_array};
use crate::hdl::{
    CaseArm, ClockedBlock, Expr, Instance, LogicOp, PortMap, ResetBranch, Stmt, Target, Write,
};
use crate::resolve::NetResolver;
use netforge_common::{binary_digits, decoded_width, encoded_width, select_width};
use netforge_netlist::{
    well_known, ArithAttrs, CoderAttrs, CompareAttrs, GateAttrs, GateOp, InstanceAttrs,
    MemoryAttrs, MuxAttrs, Node, NodeKind, PortGroup, RegisterAttrs, ResetKind, SignalType,
};

/// Lowers every node to statements: internal nodes in bucket order, then
/// the output-port pass-throughs.
pub fn emit_statements(buckets: &Buckets<'_>, resolver: &NetResolver<'_, '_>) -> Vec<Stmt> {
    let emitter = StatementEmitter { resolver };
    let mut stmts: Vec<Stmt> = buckets
        .internal()
        .flat_map(|node| emitter.lower(node))
        .collect();
    stmts.extend(
        buckets
            .outputs
            .iter()
            .filter_map(|node| emitter.pass_through(node, buckets)),
    );
    stmts
}

/// `width` digits with only bit `bit` set.
fn one_hot(bit: u32, width: u32) -> String {
    (0..width)
        .rev()
        .map(|b| if b == bit { '1' } else { '0' })
        .collect()
}

struct StatementEmitter<'r, 'i, 'a> {
    resolver: &'r NetResolver<'i, 'a>,
}

impl StatementEmitter<'_, '_, '_> {
    fn lower(&self, node: &Node) -> Vec<Stmt> {
        match &node.kind {
            NodeKind::LogicGate(attrs) => vec![self.gate(node, attrs)],
            NodeKind::Multiplexer(attrs) => vec![self.multiplexer(node, attrs)],
            NodeKind::ArithmeticUnit(attrs) => vec![self.arithmetic(node, attrs)],
            NodeKind::CompareUnit(attrs) => vec![self.compare(node, attrs)],
            NodeKind::Decoder(attrs) => vec![self.decoder(node, attrs)],
            NodeKind::Encoder(attrs) => vec![self.encoder(node, attrs)],
            NodeKind::Combiner => vec![self.combiner(node)],
            NodeKind::ModuleInstance(attrs) => vec![self.instance(node, attrs)],
            NodeKind::Memory(attrs) => self.memory(node, attrs),
            NodeKind::Register(attrs) => vec![self.register(node, attrs)],
            NodeKind::Splitter(_)
            | NodeKind::InputPort(_)
            | NodeKind::OutputPort(_)
            | NodeKind::Unknown => Vec::new(),
        }
    }

    fn data_operands(&self, node: &Node) -> Vec<Expr> {
        node.data_inputs()
            .map(|port| self.resolver.resolve_input(node, port))
            .collect()
    }

    fn gate(&self, node: &Node, attrs: &GateAttrs) -> Stmt {
        let target = self.resolver.primary_net(node);
        let width = match &attrs.struct_type {
            Some(_) => None,
            None => Some(attrs.bandwidth),
        };
        let mut operands = self.data_operands(node);
        let value = if operands.is_empty() {
            Expr::Unconnected { width }
        } else {
            let base = match attrs.op {
                GateOp::And | GateOp::Nand => LogicOp::And,
                GateOp::Or | GateOp::Nor => LogicOp::Or,
                GateOp::Xor | GateOp::Xnor => LogicOp::Xor,
                GateOp::Not => {
                    let first = operands.swap_remove(0);
                    return Stmt::Assign {
                        target,
                        value: Expr::Not(Box::new(first)),
                    };
                }
            };
            let expr = Expr::Logic { op: base, operands };
            if attrs.op.is_negated() {
                Expr::Not(Box::new(expr))
            } else {
                expr
            }
        };
        Stmt::Assign { target, value }
    }

    fn multiplexer(&self, node: &Node, attrs: &MuxAttrs) -> Stmt {
        let target = self.resolver.primary_net(node);
        let ty = node.signal_type().unwrap_or(SignalType::Bits(attrs.bandwidth));
        let data = self.data_operands(node);
        let count = data.len().max(attrs.inputs as usize);
        let choice = |i: usize| {
            data.get(i)
                .cloned()
                .unwrap_or(Expr::Unconnected { width: ty.width() })
        };
        let select_bits = select_width(count as u32);
        let select = self
            .resolver
            .resolve_port(node, well_known::SELECT, select_bits);
        match count {
            0 | 1 => Stmt::Assign {
                target,
                value: choice(0),
            },
            2 => Stmt::Select {
                target,
                cond: select,
                then: choice(1),
                otherwise: choice(0),
            },
            _ => Stmt::Case {
                target,
                selector: select,
                arms: (0..count)
                    .map(|i| CaseArm {
                        label: binary_digits(i as u64, select_bits),
                        value: choice(i),
                    })
                    .collect(),
                default: Expr::zero(&ty),
            },
        }
    }

    fn arithmetic(&self, node: &Node, attrs: &ArithAttrs) -> Stmt {
        let operands = self.data_operands(node);
        let value = if operands.is_empty() {
            Expr::Unconnected {
                width: Some(attrs.bandwidth),
            }
        } else {
            Expr::Arith {
                op: attrs.op,
                operands,
                width: attrs.bandwidth,
            }
        };
        Stmt::Assign {
            target: self.resolver.primary_net(node),
            value,
        }
    }

    fn compare(&self, node: &Node, attrs: &CompareAttrs) -> Stmt {
        let mut operands = self.data_operands(node).into_iter();
        let mut next = || {
            operands.next().unwrap_or(Expr::Unconnected {
                width: Some(attrs.bandwidth),
            })
        };
        let lhs = next();
        let rhs = next();
        Stmt::Assign {
            target: self.resolver.primary_net(node),
            value: Expr::Compare {
                op: attrs.op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                width: attrs.bandwidth,
            },
        }
    }

    fn coder_input(&self, node: &Node, width: u32) -> Expr {
        match node.data_inputs().next() {
            Some(port) => self.resolver.resolve_input(node, port),
            None => Expr::Unconnected { width: Some(width) },
        }
    }

    /// A coder whose input width cannot form a truth table drives a placeholder.
    fn degenerate_coder(&self, node: &Node, out_width: u32) -> Stmt {
        Stmt::Assign {
            target: self.resolver.primary_net(node),
            value: Expr::Unconnected {
                width: Some(out_width),
            },
        }
    }

    fn decoder(&self, node: &Node, attrs: &CoderAttrs) -> Stmt {
        let out_width = decoded_width(attrs.bandwidth);
        if attrs.bandwidth == 0 || attrs.bandwidth > CoderAttrs::MAX_DECODER_INPUT {
            return self.degenerate_coder(node, out_width);
        }
        Stmt::Case {
            target: self.resolver.primary_net(node),
            selector: self.coder_input(node, attrs.bandwidth),
            arms: (0..out_width)
                .map(|i| CaseArm {
                    label: binary_digits(u64::from(i), attrs.bandwidth),
                    value: Expr::Bits(one_hot(i, out_width)),
                })
                .collect(),
            default: Expr::Fill {
                bit: false,
                width: Some(out_width),
            },
        }
    }

    fn encoder(&self, node: &Node, attrs: &CoderAttrs) -> Stmt {
        let out_width = encoded_width(attrs.bandwidth);
        if attrs.bandwidth == 0 || attrs.bandwidth > CoderAttrs::MAX_ENCODER_INPUT {
            return self.degenerate_coder(node, out_width);
        }
        Stmt::Case {
            target: self.resolver.primary_net(node),
            selector: self.coder_input(node, attrs.bandwidth),
            arms: (0..attrs.bandwidth)
                .map(|i| CaseArm {
                    label: one_hot(i, attrs.bandwidth),
                    value: Expr::Bits(binary_digits(u64::from(i), out_width)),
                })
                .collect(),
            default: Expr::Fill {
                bit: false,
                width: Some(out_width),
            },
        }
    }

    fn combiner(&self, node: &Node) -> Stmt {
        let mut parts = self.data_operands(node);
        parts.reverse();
        let value = if parts.is_empty() {
            Expr::Unconnected {
                width: node.primary_output().and_then(|p| p.bandwidth),
            }
        } else {
            Expr::Concat(parts)
        };
        Stmt::Assign {
            target: self.resolver.primary_net(node),
            value,
        }
    }

    fn instance(&self, node: &Node, attrs: &InstanceAttrs) -> Stmt {
        let inputs = node.inputs().map(|port| PortMap {
            port: port.id.to_string(),
            direction: PortGroup::Input,
            actual: Some(self.resolver.resolve_input(node, port)),
        });
        let outputs = node.outputs().map(|port| PortMap {
            port: port.id.to_string(),
            direction: PortGroup::Output,
            actual: if self.resolver.loads(node, port).is_empty() {
                None
            } else {
                Some(Expr::Net(self.resolver.output_net(node, port)))
            },
        });
        Stmt::Instance(Instance {
            module: attrs.module.clone(),
            name: node.name.clone(),
            parameters: attrs.parameters.clone(),
            connections: inputs.chain(outputs).collect(),
        })
    }

    fn memory(&self, node: &Node, attrs: &MemoryAttrs) -> Vec<Stmt> {
        let array = memory_array(node);
        let address = self
            .resolver
            .resolve_port(node, well_known::ADDRESS, attrs.address_bandwidth);
        let write = ClockedBlock {
            clock: self.resolver.resolve_port(node, well_known::CLK, 1),
            edge: attrs.clock_edge,
            async_reset: None,
            sync_reset: None,
            guard: Some(self.resolver.resolve_port(node, well_known::WRITE_ENABLE, 1)),
            writes: vec![Write {
                target: Target::Element {
                    array: array.clone(),
                    index: address.clone(),
                    index_width: attrs.address_bandwidth,
                },
                value: self
                    .resolver
                    .resolve_port(node, well_known::DATA_IN, attrs.bandwidth),
            }],
        };
        let read = Stmt::Assign {
            target: self
                .resolver
                .output_net_by_id(node, well_known::DATA_OUT, node.name.clone()),
            value: Expr::Index {
                array,
                index: Box::new(address),
                index_width: attrs.address_bandwidth,
            },
        };
        vec![Stmt::Clocked(write), read]
    }

    fn register(&self, node: &Node, attrs: &RegisterAttrs) -> Stmt {
        let ty = SignalType::Bits(attrs.bandwidth);
        let target = self
            .resolver
            .output_net_by_id(node, well_known::DATA_OUT, node.name.clone());
        let inverted = attrs
            .inverted_output
            .then(|| inverted_net(self.resolver, node));
        let data = match node.port(well_known::DATA_IN).or_else(|| node.data_inputs().next()) {
            Some(port) => self.resolver.resolve_input(node, port),
            None => Expr::Unconnected {
                width: Some(attrs.bandwidth),
            },
        };

        let mut capture = vec![Write::net(target.clone(), data.clone())];
        let mut cleared = vec![Write::net(target, Expr::zero(&ty))];
        if let Some(inverted) = inverted {
            capture.push(Write::net(inverted.clone(), Expr::Not(Box::new(data))));
            cleared.push(Write::net(inverted, Expr::ones(&ty)));
        }

        let reset = attrs.reset.map(|cfg| {
            let branch = ResetBranch {
                signal: self.resolver.resolve_port(node, well_known::RESET, 1),
                polarity: cfg.edge,
                writes: cleared,
            };
            (cfg.kind, branch)
        });
        let (async_reset, sync_reset) = match reset {
            Some((ResetKind::Async, branch)) => (Some(branch), None),
            Some((ResetKind::Sync, branch)) => (None, Some(branch)),
            None => (None, None),
        };

        Stmt::Clocked(ClockedBlock {
            clock: self.resolver.resolve_port(node, well_known::CLK, 1),
            edge: attrs.clock_edge,
            async_reset,
            sync_reset,
            guard: attrs
                .enable
                .then(|| self.resolver.resolve_port(node, well_known::ENABLE, 1)),
            writes: capture,
        })
    }

    /// The copy from an output port's driver into the port, unless nothing
    /// drives it or the driver already writes the port's net itself.
    fn pass_through(&self, node: &Node, buckets: &Buckets<'_>) -> Option<Stmt> {
        let port = node.inputs().next()?;
        let value = self.resolver.resolve_input(node, port);
        if value.is_unconnected() {
            return None;
        }
        let driver = self.resolver.driver(node, port)?;
        if buckets.excluded_names.contains(driver.name.as_str()) && value == Expr::net(&node.name) {
            return None;
        }
        Some(Stmt::Assign {
            target: node.name.clone(),
            value,
        })
    }
}
