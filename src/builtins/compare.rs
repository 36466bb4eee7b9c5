//! Comparison operators used by the comparing predicates.

use std::cmp::Ordering;

use crate::core::ParamValue;

/// A comparison operator as written in rule data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    /// Every operator, in editor order.
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Gt,
        Comparison::Lt,
        Comparison::Ge,
        Comparison::Le,
    ];

    /// Parse an operator symbol. Unknown symbols yield `None`.
    #[must_use]
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(Comparison::Eq),
            "!=" => Some(Comparison::Ne),
            ">" => Some(Comparison::Gt),
            "<" => Some(Comparison::Lt),
            ">=" => Some(Comparison::Ge),
            "<=" => Some(Comparison::Le),
            _ => None,
        }
    }

    /// The canonical symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
        }
    }

    /// Whether `lhs <op> rhs` holds given their ordering.
    /// `None` means incomparable: only `!=` holds.
    #[must_use]
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparison::Ne, None) => true,
            (_, None) => false,
            (Comparison::Eq, Some(o)) => o == Ordering::Equal,
            (Comparison::Ne, Some(o)) => o != Ordering::Equal,
            (Comparison::Gt, Some(o)) => o == Ordering::Greater,
            (Comparison::Lt, Some(o)) => o == Ordering::Less,
            (Comparison::Ge, Some(o)) => o != Ordering::Less,
            (Comparison::Le, Some(o)) => o != Ordering::Greater,
        }
    }

    /// Compare two numbers. NaN is incomparable.
    #[must_use]
    pub fn numbers(self, lhs: f64, rhs: f64) -> bool {
        self.holds(lhs.partial_cmp(&rhs))
    }

    /// Compare two optional values.
    ///
    /// Same-typed values compare naturally (text lexicographically). Mixed
    /// types compare numerically when both have a numeric view, so a
    /// variable holding `10` equals a param typed as `"10"`. A missing side
    /// is incomparable.
    #[must_use]
    pub fn values(self, lhs: Option<&ParamValue>, rhs: Option<&ParamValue>) -> bool {
        let ordering = match (lhs, rhs) {
            (Some(a), Some(b)) => value_ordering(a, b),
            _ => None,
        };
        self.holds(ordering)
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

fn value_ordering(a: &ParamValue, b: &ParamValue) -> Option<Ordering> {
    match (a, b) {
        (ParamValue::Number(x), ParamValue::Number(y)) => x.partial_cmp(y),
        (ParamValue::Text(x), ParamValue::Text(y)) => Some(x.cmp(y)),
        (ParamValue::Bool(x), ParamValue::Bool(y)) => Some(x.cmp(y)),
        (ParamValue::Reference { entity: x }, ParamValue::Reference { entity: y }) => Some(x.cmp(y)),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        for op in Comparison::ALL {
            assert_eq!(Comparison::parse(op.symbol()), Some(op));
        }
        assert_eq!(Comparison::parse("=="), Some(Comparison::Eq));
        assert_eq!(Comparison::parse("<>"), None);
    }

    #[test]
    fn test_numbers() {
        assert!(Comparison::Gt.numbers(101.0, 100.0));
        assert!(!Comparison::Gt.numbers(100.0, 100.0));
        assert!(Comparison::Ge.numbers(100.0, 100.0));
        assert!(Comparison::Le.numbers(3.0, 4.0));
        assert!(Comparison::Ne.numbers(f64::NAN, 1.0));
        assert!(!Comparison::Eq.numbers(f64::NAN, f64::NAN));
    }

    #[test]
    fn test_values() {
        let ten = ParamValue::Number(10.0);
        let ten_text = ParamValue::Text("10".into());
        let word = ParamValue::Text("coin".into());

        assert!(Comparison::Eq.values(Some(&ten), Some(&ten_text)));
        assert!(Comparison::Lt.values(Some(&word), Some(&ParamValue::Text("gem".into()))));
        assert!(!Comparison::Eq.values(Some(&ten), Some(&word)));
        assert!(Comparison::Ne.values(Some(&ten), Some(&word)));
    }

    #[test]
    fn test_missing_side_is_incomparable() {
        let five = ParamValue::Number(5.0);
        assert!(!Comparison::Gt.values(None, Some(&five)));
        assert!(!Comparison::Eq.values(None, Some(&five)));
        assert!(Comparison::Ne.values(None, Some(&five)));
    }
}
