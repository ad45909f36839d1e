//! Elaborated-AST types handed to Tessel by an external HDL front end.
//!
//! Parsing and semantic elaboration are not Tessel's job: a front end (such
//! as a SystemVerilog compiler) produces a fully elaborated, name-resolved
//! design and hands it over in this shape. Canonical definition bodies live
//! in an arena so that every instantiation site of a shared definition refers
//! to the same [`DefnId`]; that id is also the deduplication key used during
//! lowering.
//!
//! Names are plain strings at this boundary: the AST doubles as an
//! interchange format (every type here is serde-serializable), and interning
//! happens when the design enters lowering.

#![warn(missing_docs)]

pub mod defn;
pub mod expr;

pub use defn::{Assign, Connection, Defn, DefnKind, Direction, Instance, Member, Port};
pub use expr::{Expr, SignalType};

use serde::{Deserialize, Serialize};
use tessel_common::Arena;

tessel_common::define_id!(
    /// ID of a canonical module-definition body in [`Ast::defns`].
    DefnId
);

/// A complete elaborated design as delivered by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    /// Canonical definition bodies, one per distinct definition.
    pub defns: Arena<DefnId, Defn>,
    /// Top-level instantiations, in elaboration order.
    pub top: Vec<Instance>,
}
