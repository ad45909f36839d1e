//! The technology-independent graph (TIG) — Tessel's post-lowering design
//! representation.
//!
//! A [`Tig`] holds one [`Module`] per distinct hardware block; each module is
//! a flat dataflow graph of typed [`Node`]s joined by [`EdgeRef`]s that carry
//! bit-width and signedness metadata. The graph is only ever mutated through
//! a [`Builder`], which enforces the structural invariants (dense node ids,
//! unique signal names, in-range edges) as errors rather than corrupt state.

#![warn(missing_docs)]

pub mod block;
pub mod builder;
pub mod design;
pub mod ids;
pub mod module;
pub mod node;

pub use block::{Block, BlockKind};
pub use builder::{BuildError, Builder, TigBuilder};
pub use design::Tig;
pub use ids::{ModuleId, NodeId};
pub use module::{Module, Port};
pub use node::{EdgeRef, Node, NodeKind, SignalSpec};
