//! The only sanctioned way to mutate a [`Tig`].
//!
//! Every operation validates the ids, indices, and edges it is handed and
//! fails with a [`BuildError`] instead of patching the graph; a caller that
//! sees `Err` must abandon the build. The [`Builder`] trait is the seam the
//! lowering engine is generic over, so a test double can record calls
//! without constructing a real graph.

use crate::design::Tig;
use crate::ids::{ModuleId, NodeId};
use crate::module::{Module, Port};
use crate::node::{EdgeRef, Node, NodeKind, SignalSpec};
use tessel_common::{Ident, Interner};

/// Errors raised when a mutation would violate a graph invariant.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A signal name was registered twice within one module.
    #[error("duplicate signal `{name}` in module `{module}`")]
    DuplicateSignal {
        /// The module name.
        module: String,
        /// The colliding signal name.
        name: String,
    },

    /// A signal name was looked up but never registered.
    #[error("unknown signal `{name}` in module `{module}`")]
    UnknownSignal {
        /// The module name.
        module: String,
        /// The unresolved signal name.
        name: String,
    },

    /// A module id does not refer to any module in the design.
    #[error("module id {module} is out of range")]
    UnknownModule {
        /// The raw module id.
        module: u32,
    },

    /// A node id does not refer to any node in its module.
    #[error("node id {node} is out of range in module `{module}`")]
    NodeOutOfRange {
        /// The module name.
        module: String,
        /// The raw node id.
        node: u32,
    },

    /// An input index does not exist on the addressed node.
    #[error("input {index} is out of range on node {node} in module `{module}`")]
    InputOutOfRange {
        /// The module name.
        module: String,
        /// The raw node id.
        node: u32,
        /// The input slot index.
        index: u32,
    },

    /// An input slot was read before it was resolved.
    #[error("input {index} on node {node} in module `{module}` is unset")]
    UnsetInput {
        /// The module name.
        module: String,
        /// The raw node id.
        node: u32,
        /// The input slot index.
        index: u32,
    },

    /// An edge refers to a missing node or an output index past the end of
    /// the producing node's output list.
    #[error("edge ({node}, {port}) does not name a valid output in module `{module}`")]
    InvalidEdge {
        /// The module name.
        module: String,
        /// The raw producing node id.
        node: u32,
        /// The output index.
        port: u32,
    },
}

/// Mutation and lookup interface for building a module graph.
///
/// The lowering engine drives any implementor; [`TigBuilder`] produces the
/// real graph.
pub trait Builder {
    /// Appends an empty module and returns its id.
    fn create_module(&mut self, name: Ident) -> ModuleId;

    /// Appends an input port, creates its `PrimaryInput` node, and registers
    /// the port's signal. Fails if the name is already registered.
    fn create_module_input(
        &mut self,
        module: ModuleId,
        name: Ident,
        width: u64,
        signed: bool,
    ) -> Result<NodeId, BuildError>;

    /// Appends an output port and creates its `PrimaryOutput` node with one
    /// input slot, set iff `input` is supplied. Registers nothing: an output
    /// is a sink, not a producer.
    fn create_module_output(
        &mut self,
        module: ModuleId,
        name: Ident,
        width: u64,
        signed: bool,
        input: Option<EdgeRef>,
    ) -> Result<NodeId, BuildError>;

    /// Creates a `Convert` node with one anonymous output of the given
    /// width/sign; the input slot is set iff `input` is supplied.
    fn create_conversion_node(
        &mut self,
        module: ModuleId,
        width: u64,
        signed: bool,
        input: Option<EdgeRef>,
    ) -> Result<NodeId, BuildError>;

    /// Creates an `Instance` node bound to `instance_module`, with input
    /// slots exactly as supplied (unset slots allowed) and outputs per
    /// `outputs`. Registers each named output; fails on a name collision.
    fn create_instance(
        &mut self,
        module: ModuleId,
        name: Ident,
        instance_module: ModuleId,
        inputs: Vec<Option<EdgeRef>>,
        outputs: Vec<SignalSpec>,
    ) -> Result<NodeId, BuildError>;

    /// Overwrites an input slot with a validated edge.
    fn set_input(
        &mut self,
        module: ModuleId,
        node: NodeId,
        index: u32,
        edge: EdgeRef,
    ) -> Result<(), BuildError>;

    /// Reads an input slot; fails if the slot is unset.
    fn get_input(&self, module: ModuleId, node: NodeId, index: u32) -> Result<EdgeRef, BuildError>;

    /// Looks up the output descriptor an edge points to.
    fn signal_spec(&self, module: ModuleId, edge: EdgeRef) -> Result<SignalSpec, BuildError>;

    /// Resolves a name through the module's signal map; fails if absent.
    /// This is where forward references are finally resolved.
    fn resolve_signal(&self, module: ModuleId, name: Ident) -> Result<EdgeRef, BuildError>;
}

/// The production [`Builder`]: owns the [`Tig`] under construction.
///
/// Consume it with [`TigBuilder::into_design`] after a successful build; on
/// failure drop it, which discards the partial graph.
pub struct TigBuilder<'a> {
    interner: &'a Interner,
    design: Tig,
}

impl<'a> TigBuilder<'a> {
    /// Creates a builder over an empty design.
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            design: Tig::new(),
        }
    }

    /// Read access to the design under construction.
    pub fn design(&self) -> &Tig {
        &self.design
    }

    /// Finishes the build, returning the completed design.
    pub fn into_design(self) -> Tig {
        self.design
    }

    fn module_name(&self, id: ModuleId) -> String {
        self.design
            .modules
            .get(id)
            .map(|m| self.interner.resolve(m.name).to_string())
            .unwrap_or_default()
    }

    fn module_ref(&self, id: ModuleId) -> Result<&Module, BuildError> {
        self.design
            .modules
            .get(id)
            .ok_or(BuildError::UnknownModule {
                module: id.as_raw(),
            })
    }

    fn ensure_module(&self, id: ModuleId) -> Result<(), BuildError> {
        self.module_ref(id).map(|_| ())
    }

    /// Confirms `edge` names an existing output in `module`.
    fn check_edge(&self, module: ModuleId, edge: EdgeRef) -> Result<(), BuildError> {
        let m = self.module_ref(module)?;
        let valid = m
            .nodes
            .get(edge.node)
            .is_some_and(|n| (edge.port as usize) < n.outputs.len());
        if valid {
            Ok(())
        } else {
            Err(BuildError::InvalidEdge {
                module: self.module_name(module),
                node: edge.node.as_raw(),
                port: edge.port,
            })
        }
    }

    /// Confirms `name` is free in `module`'s signal map.
    fn ensure_unregistered(&self, module: ModuleId, name: Ident) -> Result<(), BuildError> {
        if self.module_ref(module)?.signal_map.contains_key(&name) {
            return Err(BuildError::DuplicateSignal {
                module: self.module_name(module),
                name: self.interner.resolve(name).to_string(),
            });
        }
        Ok(())
    }
}

impl Builder for TigBuilder<'_> {
    fn create_module(&mut self, name: Ident) -> ModuleId {
        self.design.modules.alloc(Module::new(name))
    }

    fn create_module_input(
        &mut self,
        module: ModuleId,
        name: Ident,
        width: u64,
        signed: bool,
    ) -> Result<NodeId, BuildError> {
        self.ensure_unregistered(module, name)?;
        let m = self
            .design
            .modules
            .get_mut(module)
            .ok_or(BuildError::UnknownModule {
                module: module.as_raw(),
            })?;
        m.input_ports.push(Port {
            name,
            width,
            signed,
        });
        let node = m.nodes.alloc(Node {
            kind: NodeKind::PrimaryInput,
            inputs: Vec::new(),
            outputs: vec![SignalSpec {
                name: Some(name),
                width,
                signed,
            }],
        });
        m.signal_map.insert(name, EdgeRef { node, port: 0 });
        Ok(node)
    }

    fn create_module_output(
        &mut self,
        module: ModuleId,
        name: Ident,
        width: u64,
        signed: bool,
        input: Option<EdgeRef>,
    ) -> Result<NodeId, BuildError> {
        self.ensure_module(module)?;
        if let Some(edge) = input {
            self.check_edge(module, edge)?;
        }
        let m = self
            .design
            .modules
            .get_mut(module)
            .ok_or(BuildError::UnknownModule {
                module: module.as_raw(),
            })?;
        m.output_ports.push(Port {
            name,
            width,
            signed,
        });
        Ok(m.nodes.alloc(Node {
            kind: NodeKind::PrimaryOutput,
            inputs: vec![input],
            outputs: Vec::new(),
        }))
    }

    fn create_conversion_node(
        &mut self,
        module: ModuleId,
        width: u64,
        signed: bool,
        input: Option<EdgeRef>,
    ) -> Result<NodeId, BuildError> {
        self.ensure_module(module)?;
        if let Some(edge) = input {
            self.check_edge(module, edge)?;
        }
        let m = self
            .design
            .modules
            .get_mut(module)
            .ok_or(BuildError::UnknownModule {
                module: module.as_raw(),
            })?;
        Ok(m.nodes.alloc(Node {
            kind: NodeKind::Convert,
            inputs: vec![input],
            outputs: vec![SignalSpec {
                name: None,
                width,
                signed,
            }],
        }))
    }

    fn create_instance(
        &mut self,
        module: ModuleId,
        name: Ident,
        instance_module: ModuleId,
        inputs: Vec<Option<EdgeRef>>,
        outputs: Vec<SignalSpec>,
    ) -> Result<NodeId, BuildError> {
        self.ensure_module(module)?;
        self.ensure_module(instance_module)?;
        for edge in inputs.iter().flatten() {
            self.check_edge(module, *edge)?;
        }
        // All output names must be free, including among themselves.
        let mut batch = std::collections::HashSet::new();
        for spec in &outputs {
            if let Some(out_name) = spec.name {
                self.ensure_unregistered(module, out_name)?;
                if !batch.insert(out_name) {
                    return Err(BuildError::DuplicateSignal {
                        module: self.module_name(module),
                        name: self.interner.resolve(out_name).to_string(),
                    });
                }
            }
        }
        let registered: Vec<(Ident, u32)> = outputs
            .iter()
            .enumerate()
            .filter_map(|(i, spec)| spec.name.map(|n| (n, i as u32)))
            .collect();
        let m = self
            .design
            .modules
            .get_mut(module)
            .ok_or(BuildError::UnknownModule {
                module: module.as_raw(),
            })?;
        let node = m.nodes.alloc(Node {
            kind: NodeKind::Instance {
                name,
                module: instance_module,
            },
            inputs,
            outputs,
        });
        for (out_name, port) in registered {
            m.signal_map.insert(out_name, EdgeRef { node, port });
        }
        Ok(node)
    }

    fn set_input(
        &mut self,
        module: ModuleId,
        node: NodeId,
        index: u32,
        edge: EdgeRef,
    ) -> Result<(), BuildError> {
        self.check_edge(module, edge)?;
        let module_name = self.module_name(module);
        let m = self
            .design
            .modules
            .get_mut(module)
            .ok_or(BuildError::UnknownModule {
                module: module.as_raw(),
            })?;
        let n = m.nodes.get_mut(node).ok_or(BuildError::NodeOutOfRange {
            module: module_name.clone(),
            node: node.as_raw(),
        })?;
        let slot = n
            .inputs
            .get_mut(index as usize)
            .ok_or(BuildError::InputOutOfRange {
                module: module_name,
                node: node.as_raw(),
                index,
            })?;
        *slot = Some(edge);
        Ok(())
    }

    fn get_input(&self, module: ModuleId, node: NodeId, index: u32) -> Result<EdgeRef, BuildError> {
        let m = self.module_ref(module)?;
        let n = m.nodes.get(node).ok_or(BuildError::NodeOutOfRange {
            module: self.module_name(module),
            node: node.as_raw(),
        })?;
        let slot = n
            .inputs
            .get(index as usize)
            .ok_or(BuildError::InputOutOfRange {
                module: self.module_name(module),
                node: node.as_raw(),
                index,
            })?;
        slot.ok_or(BuildError::UnsetInput {
            module: self.module_name(module),
            node: node.as_raw(),
            index,
        })
    }

    fn signal_spec(&self, module: ModuleId, edge: EdgeRef) -> Result<SignalSpec, BuildError> {
        self.check_edge(module, edge)?;
        let m = self.module_ref(module)?;
        Ok(m.nodes[edge.node].outputs[edge.port as usize])
    }

    fn resolve_signal(&self, module: ModuleId, name: Ident) -> Result<EdgeRef, BuildError> {
        let m = self.module_ref(module)?;
        m.signal_map
            .get(&name)
            .copied()
            .ok_or_else(|| BuildError::UnknownSignal {
                module: self.module_name(module),
                name: self.interner.resolve(name).to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Interner {
        Interner::new()
    }

    #[test]
    fn modules_get_sequential_ids() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m0 = b.create_module(interner.get_or_intern("alu"));
        let m1 = b.create_module(interner.get_or_intern("top"));
        assert_eq!(m0.as_raw(), 0);
        assert_eq!(m1.as_raw(), 1);
        assert_eq!(b.design().module_count(), 2);
    }

    #[test]
    fn input_creates_port_node_and_signal() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("alu"));
        let clk = interner.get_or_intern("clk");
        let node = b.create_module_input(m, clk, 1, false).unwrap();

        let module = &b.design().modules[m];
        assert_eq!(module.input_ports.len(), 1);
        assert_eq!(module.input_ports[0].name, clk);
        assert_eq!(module.nodes[node].kind, NodeKind::PrimaryInput);
        assert_eq!(module.signal_map[&clk], EdgeRef { node, port: 0 });

        let edge = b.resolve_signal(m, clk).unwrap();
        let spec = b.signal_spec(m, edge).unwrap();
        assert_eq!(spec.width, 1);
        assert!(!spec.signed);
    }

    #[test]
    fn duplicate_input_name_fails() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("alu"));
        let clk = interner.get_or_intern("clk");
        b.create_module_input(m, clk, 1, false).unwrap();
        let err = b.create_module_input(m, clk, 1, false).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateSignal { .. }));
        assert!(err.to_string().contains("clk"));
        assert!(err.to_string().contains("alu"));
    }

    #[test]
    fn output_registers_nothing_and_starts_unset() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("alu"));
        let q = interner.get_or_intern("q");
        let node = b.create_module_output(m, q, 8, false, None).unwrap();

        let module = &b.design().modules[m];
        assert_eq!(module.output_ports.len(), 1);
        assert!(module.signal_map.is_empty());
        assert_eq!(module.nodes[node].inputs, vec![None]);

        let err = b.get_input(m, node, 0).unwrap_err();
        assert!(matches!(err, BuildError::UnsetInput { .. }));
    }

    #[test]
    fn conversion_with_immediate_input() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("alu"));
        let a = interner.get_or_intern("a");
        let pi = b.create_module_input(m, a, 8, false).unwrap();
        let conv = b
            .create_conversion_node(m, 16, true, Some(EdgeRef { node: pi, port: 0 }))
            .unwrap();

        assert_eq!(
            b.get_input(m, conv, 0).unwrap(),
            EdgeRef { node: pi, port: 0 }
        );
        let spec = b
            .signal_spec(m, EdgeRef { node: conv, port: 0 })
            .unwrap();
        assert_eq!(spec.width, 16);
        assert!(spec.signed);
        assert!(spec.name.is_none());
    }

    #[test]
    fn conversion_output_is_not_in_signal_map() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("alu"));
        b.create_conversion_node(m, 4, false, None).unwrap();
        b.create_conversion_node(m, 4, false, None).unwrap();
        assert!(b.design().modules[m].signal_map.is_empty());
    }

    #[test]
    fn instance_registers_named_outputs() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let sub = b.create_module(interner.get_or_intern("adder"));
        let top = b.create_module(interner.get_or_intern("top"));
        let sum = interner.get_or_intern("sum");
        let node = b
            .create_instance(
                top,
                interner.get_or_intern("u0"),
                sub,
                vec![None, None],
                vec![SignalSpec {
                    name: Some(sum),
                    width: 8,
                    signed: false,
                }],
            )
            .unwrap();

        assert_eq!(
            b.resolve_signal(top, sum).unwrap(),
            EdgeRef { node, port: 0 }
        );
        match &b.design().modules[top].nodes[node].kind {
            NodeKind::Instance { module, .. } => assert_eq!(*module, sub),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn instance_output_collision_fails() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let sub = b.create_module(interner.get_or_intern("adder"));
        let top = b.create_module(interner.get_or_intern("top"));
        let sum = interner.get_or_intern("sum");
        b.create_module_input(top, sum, 8, false).unwrap();
        let err = b
            .create_instance(
                top,
                interner.get_or_intern("u0"),
                sub,
                vec![],
                vec![SignalSpec {
                    name: Some(sum),
                    width: 8,
                    signed: false,
                }],
            )
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateSignal { .. }));
    }

    #[test]
    fn set_then_get_input() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("m"));
        let a = interner.get_or_intern("a");
        let pi = b.create_module_input(m, a, 4, false).unwrap();
        let po = b
            .create_module_output(m, interner.get_or_intern("y"), 4, false, None)
            .unwrap();

        b.set_input(m, po, 0, EdgeRef { node: pi, port: 0 }).unwrap();
        assert_eq!(
            b.get_input(m, po, 0).unwrap(),
            EdgeRef { node: pi, port: 0 }
        );
    }

    #[test]
    fn set_input_rejects_bad_targets() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("m"));
        let a = interner.get_or_intern("a");
        let pi = b.create_module_input(m, a, 4, false).unwrap();
        let edge = EdgeRef { node: pi, port: 0 };

        // Dangling node.
        let err = b.set_input(m, NodeId::from_raw(9), 0, edge).unwrap_err();
        assert!(matches!(err, BuildError::NodeOutOfRange { .. }));

        // Slot index past the node's input count.
        let err = b.set_input(m, pi, 3, edge).unwrap_err();
        assert!(matches!(err, BuildError::InputOutOfRange { .. }));

        // Edge pointing at a nonexistent output.
        let po = b
            .create_module_output(m, interner.get_or_intern("y"), 4, false, None)
            .unwrap();
        let err = b
            .set_input(m, po, 0, EdgeRef { node: po, port: 0 })
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidEdge { .. }));
    }

    #[test]
    fn unknown_signal_and_module_errors() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("m"));
        let missing = interner.get_or_intern("nothing");
        let err = b.resolve_signal(m, missing).unwrap_err();
        assert!(matches!(err, BuildError::UnknownSignal { .. }));
        assert!(err.to_string().contains("nothing"));

        let err = b
            .create_module_input(ModuleId::from_raw(7), missing, 1, false)
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownModule { .. }));
    }

    #[test]
    fn design_roundtrips_through_bincode() {
        let interner = setup();
        let mut b = TigBuilder::new(&interner);
        let m = b.create_module(interner.get_or_intern("m"));
        let a = interner.get_or_intern("a");
        let pi = b.create_module_input(m, a, 8, true).unwrap();
        let po = b
            .create_module_output(
                m,
                interner.get_or_intern("y"),
                8,
                true,
                Some(EdgeRef { node: pi, port: 0 }),
            )
            .unwrap();
        assert_eq!(po.as_raw(), 1);
        let tig = b.into_design();

        let config = bincode::config::standard();
        let bytes = bincode::serde::encode_to_vec(&tig, config).unwrap();
        let (back, _): (Tig, usize) =
            bincode::serde::decode_from_slice(&bytes, config).unwrap();
        assert_eq!(back, tig);
    }
}
