//! The traversal that drives lowering.
//!
//! Mirrors the shape of the input: definitions are entered depth-first, so
//! a submodule is always fully lowered (and its context popped) before the
//! instance that uses it is materialized in the parent. The module stack is
//! an explicit data structure rather than borrowed call-stack state, which
//! keeps the end-of-body wiring sweep clearly sequenced against the pop.

use std::collections::HashMap;

use tessel_ast::{
    Ast, Connection, Defn, DefnId, DefnKind, Direction, Expr, Instance, Member, Port, SignalType,
};
use tessel_common::{Ident, Interner};
use tessel_tig::{Builder, EdgeRef, ModuleId, NodeId, SignalSpec};

use crate::context::{ModuleContext, PendingInput, PendingSlot};
use crate::errors::{spec_desc, LowerError};

/// Traversal state for one lowering run.
///
/// Holds the module-context stack and the definition-to-module map that
/// deduplicates shared definitions. Create one per build; it is consumed by
/// the run and never reused.
pub struct Lowering<'a, B: Builder> {
    builder: &'a mut B,
    interner: &'a Interner,
    stack: Vec<ModuleContext>,
    lowered: HashMap<DefnId, ModuleId>,
}

impl<'a, B: Builder> Lowering<'a, B> {
    /// Creates a fresh traversal writing through `builder`.
    pub fn new(builder: &'a mut B, interner: &'a Interner) -> Self {
        Self {
            builder,
            interner,
            stack: Vec::new(),
            lowered: HashMap::new(),
        }
    }

    fn current_module(&self) -> Option<ModuleId> {
        self.stack.last().map(|ctx| ctx.module)
    }

    fn record(
        &mut self,
        node: NodeId,
        index: u32,
        request: PendingInput,
    ) -> Result<(), LowerError> {
        let ctx = self.stack.last_mut().ok_or(LowerError::NoActiveModule)?;
        ctx.pending.push(PendingSlot {
            node,
            index,
            request,
        });
        Ok(())
    }

    /// Lowers one instantiation: the definition first (deduplicated), then
    /// the instance node itself. When there is no enclosing module the
    /// instance is a hierarchy root and only its definition is
    /// materialized.
    pub fn visit_instance(&mut self, ast: &Ast, instance: &Instance) -> Result<(), LowerError> {
        let instance_module = self.visit_defn(ast, instance.defn)?;

        let Some(module) = self.current_module() else {
            return Ok(());
        };

        let mut inputs: Vec<Option<EdgeRef>> = Vec::new();
        let mut outputs: Vec<SignalSpec> = Vec::new();
        // One request per input slot, applied to the instance node once it
        // exists.
        let mut requests: Vec<PendingInput> = Vec::new();

        for connection in &instance.connections {
            match connection.port.direction {
                Direction::In => {
                    self.prepare_input(module, connection, &mut inputs, &mut requests)?;
                }
                Direction::Out => {
                    let target = self.output_binding_target(&connection.expr)?;
                    outputs.push(SignalSpec {
                        name: Some(target),
                        width: connection.port.ty.width,
                        signed: connection.port.ty.signed,
                    });
                }
                Direction::InOut | Direction::Ref => {
                    return Err(LowerError::UnsupportedPortDirection {
                        port: connection.port.name.clone(),
                        direction: connection.port.direction.as_str(),
                    });
                }
            }
        }

        let name = self.interner.get_or_intern(&instance.name);
        let node = self
            .builder
            .create_instance(module, name, instance_module, inputs, outputs)?;
        for (index, request) in requests.into_iter().enumerate() {
            self.record(node, index as u32, request)?;
        }
        Ok(())
    }

    /// Lowers a definition body, or returns the module id it already got.
    fn visit_defn(&mut self, ast: &Ast, defn_id: DefnId) -> Result<ModuleId, LowerError> {
        let defn: &Defn = ast.defns.get(defn_id).ok_or(LowerError::UnknownDefn {
            id: defn_id.as_raw(),
        })?;
        if defn.kind != DefnKind::Module {
            return Err(LowerError::UnsupportedDefinition {
                name: defn.name.clone(),
                kind: defn.kind.as_str(),
            });
        }
        if let Some(&module) = self.lowered.get(&defn_id) {
            return Ok(module);
        }

        let name = self.interner.get_or_intern(&defn.name);
        let module = self.builder.create_module(name);
        // Registered before the body is traversed so a self-instantiating
        // module resolves to this id instead of recursing.
        self.lowered.insert(defn_id, module);

        self.stack.push(ModuleContext::new(module));
        for member in &defn.members {
            self.visit_member(ast, member)?;
        }
        self.wire_connections()?;
        self.stack.pop();
        Ok(module)
    }

    fn visit_member(&mut self, ast: &Ast, member: &Member) -> Result<(), LowerError> {
        match member {
            Member::Port(port) => self.visit_port(port),
            Member::Instance(instance) => self.visit_instance(ast, instance),
            Member::Assign(_) => Err(LowerError::UnhandledNode {
                what: "continuous assignment",
            }),
        }
    }

    fn visit_port(&mut self, port: &Port) -> Result<(), LowerError> {
        let module = self.current_module().ok_or(LowerError::NoActiveModule)?;
        let name = self.interner.get_or_intern(&port.name);
        match port.direction {
            Direction::In => {
                self.builder
                    .create_module_input(module, name, port.ty.width, port.ty.signed)?;
                Ok(())
            }
            Direction::Out => {
                // An output is bound by finding a produced signal with the
                // port's own name; the producer may not exist yet, so the
                // slot stays unset until the sweep.
                let node = self.builder.create_module_output(
                    module,
                    name,
                    port.ty.width,
                    port.ty.signed,
                    None,
                )?;
                self.record(
                    node,
                    0,
                    PendingInput::Resolve {
                        name,
                        width: port.ty.width,
                        signed: port.ty.signed,
                    },
                )
            }
            Direction::InOut | Direction::Ref => Err(LowerError::UnsupportedPortDirection {
                port: port.name.clone(),
                direction: port.direction.as_str(),
            }),
        }
    }

    /// Handles one input-port connection of an instance.
    ///
    /// A conversion becomes a `Convert` node sized to the destination; its
    /// operand is recorded against the conversion node and its output edge
    /// fills the instance slot immediately. A plain named reference leaves
    /// the slot unset and records the name against the instance.
    fn prepare_input(
        &mut self,
        module: ModuleId,
        connection: &Connection,
        inputs: &mut Vec<Option<EdgeRef>>,
        requests: &mut Vec<PendingInput>,
    ) -> Result<(), LowerError> {
        match &connection.expr {
            Expr::Conversion { ty, operand } => {
                let node = self
                    .builder
                    .create_conversion_node(module, ty.width, ty.signed, None)?;
                let (name, operand_ty) = named_value(operand)?;
                let name = self.interner.get_or_intern(name);
                self.record(
                    node,
                    0,
                    PendingInput::Resolve {
                        name,
                        width: operand_ty.width,
                        signed: operand_ty.signed,
                    },
                )?;
                inputs.push(Some(EdgeRef { node, port: 0 }));
                requests.push(PendingInput::Verify);
                Ok(())
            }
            Expr::NamedValue { name, ty } => {
                let name = self.interner.get_or_intern(name);
                inputs.push(None);
                requests.push(PendingInput::Resolve {
                    name,
                    width: ty.width,
                    signed: ty.signed,
                });
                Ok(())
            }
            other => Err(LowerError::ExpectedNamedValue {
                found: other.kind_name(),
            }),
        }
    }

    /// Extracts the wire name an instance output drives.
    ///
    /// The connection must be an assignment with an empty right-hand side
    /// whose target is a plain named reference.
    fn output_binding_target(&mut self, expr: &Expr) -> Result<Ident, LowerError> {
        match expr {
            Expr::Assignment { lhs, rhs: None } => {
                let (name, _) = named_value(lhs)?;
                Ok(self.interner.get_or_intern(name))
            }
            Expr::Assignment { rhs: Some(_), .. } => Err(LowerError::InvalidOutputBinding {
                found: "an assignment with a right-hand side",
            }),
            other => Err(LowerError::InvalidOutputBinding {
                found: other.kind_name(),
            }),
        }
    }

    /// The end-of-body sweep: resolves every recorded request for the
    /// innermost module and patches the slots, verifying width and sign
    /// against the producer.
    fn wire_connections(&mut self) -> Result<(), LowerError> {
        let ctx = self.stack.last_mut().ok_or(LowerError::NoActiveModule)?;
        let module = ctx.module;
        let pending = std::mem::take(&mut ctx.pending);

        for slot in pending {
            match slot.request {
                PendingInput::Resolve {
                    name,
                    width,
                    signed,
                } => {
                    let edge = self.builder.resolve_signal(module, name)?;
                    let spec = self.builder.signal_spec(module, edge)?;
                    if spec.width != width || spec.signed != signed {
                        return Err(LowerError::SignalMismatch {
                            name: self.interner.resolve(name).to_string(),
                            expected: spec_desc(width, signed),
                            found: spec_desc(spec.width, spec.signed),
                        });
                    }
                    self.builder.set_input(module, slot.node, slot.index, edge)?;
                }
                PendingInput::Verify => {
                    self.builder.get_input(module, slot.node, slot.index)?;
                }
            }
        }
        Ok(())
    }
}

fn named_value(expr: &Expr) -> Result<(&str, SignalType), LowerError> {
    match expr {
        Expr::NamedValue { name, ty } => Ok((name, *ty)),
        other => Err(LowerError::ExpectedNamedValue {
            found: other.kind_name(),
        }),
    }
}
