//! Symbolic expressions over the two-element field.
//!
//! Expressions stay abstract until code generation: the evaluator builds
//! and compares trees, and only the emitter renders them. By construction
//! the evaluator only ever combines plain references (operands are resolved
//! to canonical names before a gate is applied), but rendering handles
//! nested operands anyway by parenthesizing them.

use std::fmt;

/// An operator-tagged expression tree over `{0, 1}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// A terminal reference: share element, mask, temporary, or state slot.
    Ref(String),
    /// Field addition (models `xor`).
    Sum(Box<Expr>, Box<Expr>),
    /// Field multiplication (models `and`, and `or` as well — the upstream
    /// model folds both onto the same operation).
    Product(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Terminal reference by name.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// Sum of two references.
    pub fn sum(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Sum(Box::new(Self::reference(a)), Box::new(Self::reference(b)))
    }

    /// Product of two references.
    pub fn product(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Product(Box::new(Self::reference(a)), Box::new(Self::reference(b)))
    }

    /// Whether this expression is a bare pass-through of one symbol.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// The referenced name, when this is an identity.
    #[must_use]
    pub fn as_ref_name(&self) -> Option<&str> {
        match self {
            Self::Ref(name) => Some(name),
            _ => None,
        }
    }

    /// All terminal names, left to right.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Ref(name) => out.push(name),
            Self::Sum(a, b) | Self::Product(a, b) => {
                a.collect_refs(out);
                b.collect_refs(out);
            }
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            write!(f, "{self}")
        } else {
            write!(f, "({self})")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref(name) => f.write_str(name),
            Self::Sum(a, b) => {
                a.fmt_operand(f)?;
                f.write_str(" + ")?;
                b.fmt_operand(f)
            }
            Self::Product(a, b) => {
                a.fmt_operand(f)?;
                f.write_str(" * ")?;
                b.fmt_operand(f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_flat_combinators() {
        assert_eq!(Expr::sum("secret_a[0]", "secret_a[1]").to_string(), "secret_a[0] + secret_a[1]");
        assert_eq!(Expr::product("t_3", "mask_0").to_string(), "t_3 * mask_0");
        assert_eq!(Expr::reference("s_2").to_string(), "s_2");
    }

    #[test]
    fn parenthesizes_nested_operands() {
        let e = Expr::Product(
            Box::new(Expr::sum("a", "b")),
            Box::new(Expr::reference("c")),
        );
        assert_eq!(e.to_string(), "(a + b) * c");
    }

    #[test]
    fn identity_detection() {
        assert!(Expr::reference("t_0").is_identity());
        assert!(!Expr::sum("a", "b").is_identity());
        assert_eq!(Expr::reference("t_0").as_ref_name(), Some("t_0"));
    }

    #[test]
    fn collects_references_left_to_right() {
        assert_eq!(Expr::sum("x", "y").references(), vec!["x", "y"]);
    }
}
