//! Comparison operator catalog.

use crate::error::{QueryError, QueryResult};
use std::fmt;

/// Number of arguments an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, got: usize) -> bool {
        match self {
            Arity::Exactly(n) => got == n,
            Arity::AtLeast(n) => got >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Comparison operator of a leaf predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `path = a`
    Eq,
    /// `path <> a`
    Ne,
    /// `path < a`
    Lt,
    /// `path <= a`
    Leq,
    /// `path > a`
    Gt,
    /// `path >= a`
    Geq,
    /// `path LIKE a`
    Like,
    /// `path BETWEEN a AND b`
    Between,
    /// `path IN (a, b, ...)`
    In,
    /// `path IS NULL`
    IsNull,
    /// `path IS NOT NULL`
    IsNotNull,
}

impl Operator {
    /// Token written between the path and the first argument.
    pub const fn token(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Leq => "<=",
            Operator::Gt => ">",
            Operator::Geq => ">=",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::In => "IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Token joining successive arguments, if the operator takes several.
    pub const fn joiner(self) -> Option<&'static str> {
        match self {
            Operator::Between => Some(" AND "),
            Operator::In => Some(", "),
            _ => None,
        }
    }

    pub const fn arity(self) -> Arity {
        match self {
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Leq
            | Operator::Gt
            | Operator::Geq
            | Operator::Like => Arity::Exactly(1),
            Operator::Between => Arity::Exactly(2),
            Operator::In => Arity::AtLeast(0),
            Operator::IsNull | Operator::IsNotNull => Arity::Exactly(0),
        }
    }

    /// Fail with [`QueryError::ArityMismatch`] unless `got` arguments fit.
    pub fn check_arity(self, got: usize) -> QueryResult<()> {
        let expected = self.arity();
        if expected.accepts(got) {
            Ok(())
        } else {
            Err(QueryError::ArityMismatch {
                operator: self,
                expected,
                got,
            })
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_catalog() {
        assert_eq!(Operator::Eq.arity(), Arity::Exactly(1));
        assert_eq!(Operator::Like.arity(), Arity::Exactly(1));
        assert_eq!(Operator::Between.arity(), Arity::Exactly(2));
        assert_eq!(Operator::In.arity(), Arity::AtLeast(0));
        assert_eq!(Operator::IsNull.arity(), Arity::Exactly(0));
    }

    #[test]
    fn check_arity_rejects_mismatch() {
        assert!(Operator::Between.check_arity(2).is_ok());
        assert!(Operator::In.check_arity(0).is_ok());
        let err = Operator::Geq.check_arity(2).unwrap_err();
        assert!(matches!(
            err,
            QueryError::ArityMismatch {
                operator: Operator::Geq,
                got: 2,
                ..
            }
        ));
    }
}
