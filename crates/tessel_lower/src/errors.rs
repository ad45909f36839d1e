//! Lowering failures.
//!
//! Every variant is fatal: the engine stops at the first failure and the
//! caller receives exactly one error describing the offending construct.

use tessel_tig::BuildError;

/// A fatal lowering failure.
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    /// A graph invariant was violated while mutating the design.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A definition of a kind other than `module` was encountered.
    #[error("unsupported definition kind `{kind}` for `{name}`")]
    UnsupportedDefinition {
        /// The definition name.
        name: String,
        /// The definition kind.
        kind: &'static str,
    },

    /// A port direction this stage cannot lower.
    #[error("`{direction}` port `{port}` is not supported")]
    UnsupportedPortDirection {
        /// The port name.
        port: String,
        /// The direction keyword.
        direction: &'static str,
    },

    /// A consumer expected a different width or sign than the resolved
    /// producer declares, with no conversion in between.
    #[error("signal `{name}`: expected {expected}, found {found}")]
    SignalMismatch {
        /// The signal name.
        name: String,
        /// The consumer's expectation, e.g. `8-bit unsigned`.
        expected: String,
        /// The producer's declaration.
        found: String,
    },

    /// An expression position that requires a plain named reference held
    /// something else.
    #[error("expected a named signal reference, found {found}")]
    ExpectedNamedValue {
        /// The expression kind that was found.
        found: &'static str,
    },

    /// An output port connection that is not `name = <empty>`.
    #[error("output connection must be a pass-through binding, found {found}")]
    InvalidOutputBinding {
        /// Description of what was found instead.
        found: &'static str,
    },

    /// An instance referenced a definition id the design does not contain.
    #[error("instance references unknown definition id {id}")]
    UnknownDefn {
        /// The raw definition id.
        id: u32,
    },

    /// An AST construct this stage has no lowering for.
    #[error("unhandled AST node: {what}")]
    UnhandledNode {
        /// The construct name.
        what: &'static str,
    },

    /// A body construct was visited with no module context on the stack.
    #[error("no module context is active")]
    NoActiveModule,
}

/// Formats a width/sign pair the way mismatch messages print it.
pub(crate) fn spec_desc(width: u64, signed: bool) -> String {
    format!(
        "{width}-bit {}",
        if signed { "signed" } else { "unsigned" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_sides() {
        let err = LowerError::SignalMismatch {
            name: "acc".to_string(),
            expected: spec_desc(16, true),
            found: spec_desc(8, false),
        };
        let msg = err.to_string();
        assert!(msg.contains("acc"));
        assert!(msg.contains("16-bit signed"));
        assert!(msg.contains("8-bit unsigned"));
    }

    #[test]
    fn direction_message_names_keyword() {
        let err = LowerError::UnsupportedPortDirection {
            port: "bus".to_string(),
            direction: "inout",
        };
        assert!(err.to_string().contains("inout"));
        assert!(err.to_string().contains("bus"));
    }

    #[test]
    fn build_error_passes_through() {
        let err: LowerError = BuildError::UnknownModule { module: 3 }.into();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn unhandled_node_message() {
        let err = LowerError::UnhandledNode {
            what: "continuous assignment",
        };
        assert_eq!(
            err.to_string(),
            "unhandled AST node: continuous assignment"
        );
    }
}
