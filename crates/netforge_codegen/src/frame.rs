//! Module frame assembly: ports, declarations and statements in one [`Module`].

use crate::classify::Buckets;
use crate::decl::emit_declarations;
use crate::hdl::{Decl, Module, ModulePort, Stmt, Storage};
use crate::resolve::NetResolver;
use crate::stmt::emit_statements;
use netforge_netlist::{Node, PortGroup, SignalType};
use std::collections::{BTreeSet, HashSet};

/// Builds the complete module for a classified snapshot.
///
/// Nets assigned from procedural blocks get [`Storage::Reg`], whether they
/// are internal declarations or module outputs.
pub fn assemble(name: &str, buckets: &Buckets<'_>, resolver: &NetResolver<'_, '_>) -> Module {
    let stmts = emit_statements(buckets, resolver);
    let mut decls = emit_declarations(buckets, resolver);

    let procedural: HashSet<String> = stmts
        .iter()
        .flat_map(Stmt::procedural_targets)
        .map(str::to_string)
        .collect();
    for decl in &mut decls {
        if let Decl::Signal { name, storage, .. } = decl {
            if procedural.contains(name.as_str()) {
                *storage = Storage::Reg;
            }
        }
    }

    let port = |node: &Node, direction: PortGroup| ModulePort {
        name: node.name.clone(),
        direction,
        ty: node.signal_type().unwrap_or(SignalType::Bits(1)),
        storage: if procedural.contains(node.name.as_str()) {
            Storage::Reg
        } else {
            Storage::Wire
        },
    };
    let ports: Vec<ModulePort> = buckets
        .inputs
        .iter()
        .map(|node| port(*node, PortGroup::Input))
        .chain(buckets.outputs.iter().map(|node| port(*node, PortGroup::Output)))
        .collect();

    let packages = collect_packages(&ports, &decls);

    Module {
        name: name.to_string(),
        ports,
        packages,
        decls,
        stmts,
    }
}

/// Distinct struct packages named by ports and declarations, sorted.
fn collect_packages(ports: &[ModulePort], decls: &[Decl]) -> Vec<String> {
    let port_types = ports.iter().map(|p| &p.ty);
    let decl_types = decls.iter().filter_map(|d| match d {
        Decl::Signal { ty, .. } => Some(ty),
        Decl::Memory { .. } => None,
    });
    port_types
        .chain(decl_types)
        .filter_map(|ty| match ty {
            SignalType::Struct(st) => Some(st.package.clone()),
            SignalType::Bits(_) => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
