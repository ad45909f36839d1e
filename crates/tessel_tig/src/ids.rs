//! Opaque ID newtypes for graph entities.

tessel_common::define_id!(
    /// ID of a module in a [`Tig`](crate::Tig); its index in the module
    /// arena, stable for the life of the design.
    ModuleId
);

tessel_common::define_id!(
    /// ID of a node within one module's dataflow graph; its index in the
    /// node arena, assigned at creation and never reused.
    NodeId
);
