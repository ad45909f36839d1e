//! Sequential-element blocks — a reserved extension point.
//!
//! Lowering of latches, flip-flops, memories, and hard macros is a later
//! stage's job; the graph keeps them representable so that stage can
//! populate [`Module::blocks`](crate::Module::blocks) without reshaping the
//! data model. Nothing in this crate constructs a `Block`.

use crate::ids::NodeId;
use crate::module::Port;
use serde::{Deserialize, Serialize};
use tessel_common::Ident;

/// The kind of a sequential block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// A memory array.
    Memory,
    /// A level-sensitive latch.
    Latch,
    /// An edge-triggered flip-flop.
    Ff,
    /// A hard macro supplied by the target library.
    Macro,
    /// Uninitialized sentinel.
    Unknown,
}

/// One sequential element within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The block kind.
    pub kind: BlockKind,
    /// The block's instance name.
    pub name: Ident,
    /// The library primitive implementing this block, if mapped.
    pub impl_name: Option<Ident>,
    /// Named input ports.
    pub input_ports: Vec<Port>,
    /// Named output ports.
    pub output_ports: Vec<Port>,
    /// Nodes feeding the block, in input-port order.
    pub inputs: Vec<NodeId>,
    /// Nodes driven by the block, in output-port order.
    pub outputs: Vec<NodeId>,
    /// Instantiation parameters, in declaration order.
    pub params: Vec<(Ident, String)>,
    /// Free-form attributes, in declaration order.
    pub attributes: Vec<(Ident, String)>,
}
