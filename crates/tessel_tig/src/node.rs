//! Dataflow graph vertices and the edges that join them.

use crate::ids::{ModuleId, NodeId};
use serde::{Deserialize, Serialize};
use tessel_common::Ident;

/// A reference to one specific output of one specific node.
///
/// Valid only while the referenced node exists in the same module and
/// `port` is within that node's output count; the [`Builder`](crate::Builder)
/// rejects edges that do not satisfy this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    /// The producing node.
    pub node: NodeId,
    /// The output index on the producing node.
    pub port: u32,
}

/// Descriptor of one node output: an optional name plus width and sign.
///
/// Conversion outputs are anonymous; everything else that can be resolved by
/// name carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSpec {
    /// The signal name, if the output is registered in the signal map.
    pub name: Option<Ident>,
    /// Bit width.
    pub width: u64,
    /// `true` for signed.
    pub signed: bool,
}

/// The vertex kinds of a module's dataflow graph.
///
/// Lowering constructs `PrimaryInput`, `PrimaryOutput`, `Instance`, and
/// `Convert`. The remaining kinds are reserved for sequential and arithmetic
/// lowering stages and must stay representable; `Unknown` marks
/// uninitialized state and is never valid in a completed module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A module input; its single output is the port's signal.
    PrimaryInput,
    /// A module output; a sink with exactly one input slot.
    PrimaryOutput,
    /// A submodule call bound to another module in the same design.
    Instance {
        /// The instance name.
        name: Ident,
        /// The instantiated module.
        module: ModuleId,
    },
    /// An explicit width/sign adaptation.
    Convert,
    /// Data entering a sequential element (reserved).
    RegisterInput,
    /// Data leaving a sequential element (reserved).
    RegisterOutput,
    /// A constant driver (reserved).
    Const {
        /// The constant's textual value.
        value: String,
    },
    /// A bit-range split (reserved).
    Split {
        /// Widths of the produced segments, in order.
        segments: Vec<u64>,
    },
    /// A bit-range merge (reserved).
    Merge,
    /// A combinational operator (reserved).
    Op {
        /// The operator mnemonic.
        op: String,
    },
    /// Uninitialized sentinel.
    Unknown,
}

/// A vertex in a module's dataflow graph.
///
/// Inputs are slots: `None` marks a slot recorded for later resolution
/// during the wiring sweep, and a completed module contains no `None` slots
/// for the node kinds lowering produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The vertex kind and its payload.
    pub kind: NodeKind,
    /// Input slots in port order.
    pub inputs: Vec<Option<EdgeRef>>,
    /// Output descriptors in port order.
    pub outputs: Vec<SignalSpec>,
}
