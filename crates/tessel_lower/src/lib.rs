//! AST-to-TIG lowering.
//!
//! Walks an elaborated design depth-first and materializes it through a
//! [`Builder`], one module per distinct definition. Wiring is two-phase:
//! while a module body is traversed, inputs that refer to signals by name
//! are recorded against the node instead of resolved (the producer may
//! appear later in traversal order), and a sweep at the end of the body
//! resolves every recorded request, verifies width and sign, and patches
//! the slots. Any violation aborts the whole build with a [`LowerError`];
//! there is no partial output.

#![warn(missing_docs)]

mod context;
pub mod engine;
pub mod errors;

pub use errors::LowerError;

use tessel_ast::Ast;
use tessel_common::Interner;
use tessel_tig::{Builder, Tig, TigBuilder};

use engine::Lowering;

/// Lowers an elaborated design into `builder`.
///
/// Generic over the [`Builder`] implementation, so tests can substitute a
/// recording double for the real graph builder.
pub fn lower<B: Builder>(
    ast: &Ast,
    interner: &Interner,
    builder: &mut B,
) -> Result<(), LowerError> {
    let mut lowering = Lowering::new(builder, interner);
    for instance in &ast.top {
        lowering.visit_instance(ast, instance)?;
    }
    Ok(())
}

/// Lowers an elaborated design into a fresh [`Tig`].
///
/// On failure the partially built graph is discarded; an `Err` result
/// carries no design at all.
pub fn lower_to_tig(ast: &Ast, interner: &Interner) -> Result<Tig, LowerError> {
    let mut builder = TigBuilder::new(interner);
    lower(ast, interner, &mut builder)?;
    Ok(builder.into_design())
}
