//! Definition bodies, ports, and instantiations.

use crate::expr::{Expr, SignalType};
use crate::DefnId;
use serde::{Deserialize, Serialize};

/// What a definition body declares.
///
/// Lowering only accepts [`DefnKind::Module`]; the other kinds exist in
/// elaborated SystemVerilog designs and are rejected with a build failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefnKind {
    /// A hardware module.
    Module,
    /// A SystemVerilog interface.
    Interface,
    /// A SystemVerilog program block.
    Program,
}

impl DefnKind {
    /// Human-readable kind name, used in failure messages.
    pub fn as_str(self) -> &'static str {
        match self {
            DefnKind::Module => "module",
            DefnKind::Interface => "interface",
            DefnKind::Program => "program",
        }
    }
}

/// One canonical definition body.
///
/// All instantiation sites of the same definition share one `Defn`; its
/// [`DefnId`] is the identity under which lowering deduplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defn {
    /// The definition kind.
    pub kind: DefnKind,
    /// The definition name.
    pub name: String,
    /// Body members in declaration order.
    pub members: Vec<Member>,
}

/// A member of a definition body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    /// A port declaration.
    Port(Port),
    /// A submodule instantiation.
    Instance(Instance),
    /// A continuous assignment. Real elaborated bodies contain these, but
    /// this lowering stage does not handle them.
    Assign(Assign),
}

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Data flows into the module.
    In,
    /// Data flows out of the module.
    Out,
    /// Bidirectional.
    InOut,
    /// A reference port (SystemVerilog `ref`).
    Ref,
}

impl Direction {
    /// Human-readable direction name, used in failure messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "input",
            Direction::Out => "output",
            Direction::InOut => "inout",
            Direction::Ref => "ref",
        }
    }
}

/// A port declaration: name, direction, and resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: Direction,
    /// The elaborated width and signedness.
    pub ty: SignalType,
}

/// One instantiation of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// The instance name.
    pub name: String,
    /// The canonical definition body being instantiated.
    pub defn: DefnId,
    /// Port connections in the instantiated definition's declaration order.
    pub connections: Vec<Connection>,
}

/// A port connection on an instantiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// The port being connected (direction and type included).
    pub port: Port,
    /// The connected expression.
    pub expr: Expr,
}

/// A continuous assignment (`assign target = value;`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    /// The assignment target.
    pub target: Expr,
    /// The driven value.
    pub value: Expr,
}
