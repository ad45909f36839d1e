//! Per-module lowering state.
//!
//! One [`ModuleContext`] lives on the engine's explicit stack for each
//! module currently being lowered. It carries the module id plus the
//! pending-input table: every input slot that must be wired by name is
//! recorded here and resolved in one sweep after the whole body has been
//! traversed, which is what makes forward references work. The context is
//! discarded when its module is popped, so peak state is bounded by
//! definition nesting depth, not design size.

use tessel_common::Ident;
use tessel_tig::{ModuleId, NodeId};

/// What the wiring sweep must do for one recorded input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingInput {
    /// Resolve `name` through the signal map, check the producer against
    /// the recorded width/sign, and patch the slot.
    Resolve {
        /// The expected producing signal.
        name: Ident,
        /// The consumer's expected width.
        width: u64,
        /// The consumer's expected signedness.
        signed: bool,
    },
    /// The slot was filled when its node was created; read it back to
    /// confirm it is set.
    Verify,
}

/// One recorded entry of the pending-input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSlot {
    /// The node whose input awaits wiring.
    pub node: NodeId,
    /// The input slot index on that node.
    pub index: u32,
    /// What the sweep should do.
    pub request: PendingInput,
}

/// Lowering state for one module on the traversal stack.
#[derive(Debug)]
pub(crate) struct ModuleContext {
    /// The module under construction.
    pub module: ModuleId,
    /// Recorded wiring requests, in record order.
    pub pending: Vec<PendingSlot>,
}

impl ModuleContext {
    pub(crate) fn new(module: ModuleId) -> Self {
        Self {
            module,
            pending: Vec::new(),
        }
    }
}
