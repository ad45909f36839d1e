//! One lowered hardware block: ports, dataflow graph, reserved sequential
//! blocks, and the name-to-edge signal map.

use crate::block::Block;
use crate::ids::NodeId;
use crate::node::{EdgeRef, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tessel_common::{Arena, Ident};

/// A port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: Ident,
    /// Bit width.
    pub width: u64,
    /// `true` for signed.
    pub signed: bool,
}

/// One module of a [`Tig`](crate::Tig).
///
/// Nodes are created in traversal order and keep their arena position as
/// identity. The signal map is filled during construction and remains
/// available afterward for name lookup; at most one entry ever exists per
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: Ident,
    /// Input ports in declaration order.
    pub input_ports: Vec<Port>,
    /// Output ports in declaration order.
    pub output_ports: Vec<Port>,
    /// The dataflow graph.
    pub nodes: Arena<NodeId, Node>,
    /// Sequential elements. Reserved; empty after front-end lowering.
    pub blocks: Vec<Block>,
    /// Name-to-edge resolution table.
    pub signal_map: HashMap<Ident, EdgeRef>,
}

impl Module {
    /// Creates an empty module with the given name.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            nodes: Arena::new(),
            blocks: Vec::new(),
            signal_map: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn new_module_is_empty() {
        let m = Module::new(Ident::from_raw(0));
        assert!(m.nodes.is_empty());
        assert!(m.blocks.is_empty());
        assert!(m.signal_map.is_empty());
        assert!(m.input_ports.is_empty());
        assert!(m.output_ports.is_empty());
    }

    #[test]
    fn node_ids_are_dense_and_ordered() {
        let mut m = Module::new(Ident::from_raw(0));
        let a = m.nodes.alloc(Node {
            kind: NodeKind::PrimaryInput,
            inputs: vec![],
            outputs: vec![],
        });
        let b = m.nodes.alloc(Node {
            kind: NodeKind::PrimaryOutput,
            inputs: vec![None],
            outputs: vec![],
        });
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(m.nodes.len(), 2);
    }

    #[test]
    fn signal_map_binds_names_to_edges() {
        let mut m = Module::new(Ident::from_raw(0));
        let n = m.nodes.alloc(Node {
            kind: NodeKind::PrimaryInput,
            inputs: vec![],
            outputs: vec![],
        });
        let name = Ident::from_raw(1);
        m.signal_map.insert(name, EdgeRef { node: n, port: 0 });
        assert_eq!(m.signal_map[&name].node, n);
    }
}
