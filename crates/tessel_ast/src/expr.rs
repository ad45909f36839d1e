//! Expression nodes appearing in port connections.
//!
//! The front end resolves all types during elaboration, so every value-
//! producing expression carries its final [`SignalType`]. Where a connection
//! needs a width or sign change, the front end wraps the operand in
//! [`Expr::Conversion`]; lowering turns that wrapper into an explicit
//! conversion node rather than coercing silently.

use serde::{Deserialize, Serialize};

/// The elaborated type of a signal-valued expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalType {
    /// Bit width.
    pub width: u64,
    /// `true` for signed, `false` for unsigned.
    pub signed: bool,
}

/// An expression connected to an instance port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A reference to a named value (wire, port, or instance output).
    NamedValue {
        /// The referenced name.
        name: String,
        /// The referenced value's type.
        ty: SignalType,
    },
    /// A width/sign adaptation around an inner expression.
    Conversion {
        /// The type after conversion.
        ty: SignalType,
        /// The value being converted.
        operand: Box<Expr>,
    },
    /// An assignment. An output port connection arrives as an assignment
    /// with an empty right-hand side: the left-hand name is the wire the
    /// port drives.
    Assignment {
        /// The assignment target.
        lhs: Box<Expr>,
        /// The driven value; `None` for an output pass-through binding.
        rhs: Option<Box<Expr>>,
    },
    /// An integer literal. Not lowerable by this stage.
    Literal {
        /// The literal bits, zero-extended.
        value: u64,
        /// The literal's type.
        ty: SignalType,
    },
}

impl Expr {
    /// Short node-kind name, used in failure messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::NamedValue { .. } => "named value",
            Expr::Conversion { .. } => "conversion",
            Expr::Assignment { .. } => "assignment",
            Expr::Literal { .. } => "literal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u8_ty() -> SignalType {
        SignalType {
            width: 8,
            signed: false,
        }
    }

    #[test]
    fn conversion_wraps_operand() {
        let expr = Expr::Conversion {
            ty: SignalType {
                width: 16,
                signed: true,
            },
            operand: Box::new(Expr::NamedValue {
                name: "acc".to_string(),
                ty: u8_ty(),
            }),
        };
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }

    #[test]
    fn output_binding_has_no_rhs() {
        let expr = Expr::Assignment {
            lhs: Box::new(Expr::NamedValue {
                name: "sum".to_string(),
                ty: u8_ty(),
            }),
            rhs: None,
        };
        match expr {
            Expr::Assignment { rhs: None, .. } => {}
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn kind_names() {
        assert_eq!(
            Expr::Literal {
                value: 0,
                ty: u8_ty()
            }
            .kind_name(),
            "literal"
        );
        assert_eq!(
            Expr::NamedValue {
                name: "x".to_string(),
                ty: u8_ty()
            }
            .kind_name(),
            "named value"
        );
    }
}
