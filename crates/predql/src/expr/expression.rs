//! Immutable predicate trees.

use super::argument::Argument;
use super::conjunction::Conjunction;
use super::format::{RenderOptions, render};
use super::operator::Operator;
use crate::alias::Path;
use crate::error::{QueryError, QueryResult};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// Leaf predicate: `path <operator> arguments`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    path: Path,
    operator: Operator,
    arguments: Vec<Argument>,
}

impl Comparison {
    /// Create a comparison, checking the argument count against the operator.
    pub fn new(path: Path, operator: Operator, arguments: Vec<Argument>) -> QueryResult<Self> {
        operator.check_arity(arguments.len())?;
        Ok(Self::new_unchecked(path, operator, arguments))
    }

    /// Caller guarantees `arguments` fits the operator's arity.
    pub(crate) fn new_unchecked(path: Path, operator: Operator, arguments: Vec<Argument>) -> Self {
        Self {
            path,
            operator,
            arguments,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

/// Conjunction node over two or more terms.
///
/// Only the combinators on [`Expression`] construct this, so a node never
/// holds a single term and never directly contains a child of the same
/// associative conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct Combined {
    conjunction: Conjunction,
    terms: Vec<Expression>,
}

impl Combined {
    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn terms(&self) -> &[Expression] {
        &self.terms
    }
}

/// A boolean predicate.
///
/// Every operation returns a new value; nothing is mutated after construction.
///
/// # Example
/// ```ignore
/// let e = first.eq("Peter") & (last.like("%Pan") | age.between(18, 42));
/// assert_eq!(
///     e.to_string(),
///     "c.firstName = ?1 AND (c.lastName LIKE ?2 OR c.age BETWEEN ?3 AND ?4)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison(Comparison),
    /// Always-true / always-false leaf.
    Constant(bool),
    Combined(Combined),
    Negated(Box<Expression>),
}

impl Expression {
    pub const TRUE: Expression = Expression::Constant(true);
    pub const FALSE: Expression = Expression::Constant(false);

    /// Combine `terms` under `conjunction`.
    ///
    /// An empty list fails with [`QueryError::EmptyCombination`]; a single
    /// term is returned unchanged.
    pub fn combine_all(
        conjunction: Conjunction,
        terms: impl IntoIterator<Item = Expression>,
    ) -> QueryResult<Expression> {
        let mut terms = terms.into_iter();
        let first = terms.next().ok_or(QueryError::EmptyCombination)?;
        Ok(first.join(conjunction, terms))
    }

    /// All of `terms` must hold.
    pub fn all(terms: impl IntoIterator<Item = Expression>) -> QueryResult<Expression> {
        Self::combine_all(Conjunction::And, terms)
    }

    /// At least one of `terms` must hold.
    pub fn any(terms: impl IntoIterator<Item = Expression>) -> QueryResult<Expression> {
        Self::combine_all(Conjunction::Or, terms)
    }

    /// Combine this expression with additional `terms`.
    ///
    /// If `self` is already combined with the same associative conjunction the
    /// new terms are appended to it instead of nesting another level.
    pub fn combine(
        self,
        conjunction: Conjunction,
        terms: impl IntoIterator<Item = Expression>,
    ) -> QueryResult<Expression> {
        let mut terms = terms.into_iter().peekable();
        if terms.peek().is_none() {
            return Err(QueryError::EmptyCombination);
        }
        Ok(self.join(conjunction, terms))
    }

    pub fn and(self, terms: impl IntoIterator<Item = Expression>) -> QueryResult<Expression> {
        self.combine(Conjunction::And, terms)
    }

    pub fn or(self, terms: impl IntoIterator<Item = Expression>) -> QueryResult<Expression> {
        self.combine(Conjunction::Or, terms)
    }

    /// Logical negation. De Morgan is never applied here; the formatter
    /// decides how a negation is written.
    pub fn negate(self) -> Expression {
        Expression::Negated(Box::new(self))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    /// Every path referenced by the tree, in emission order.
    pub fn paths(&self) -> Vec<&Path> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a Path>) {
        match self {
            Expression::Comparison(c) => {
                out.push(&c.path);
                out.extend(c.arguments.iter().filter_map(|a| match a {
                    Argument::Reference(p) => Some(p),
                    Argument::Literal(_) => None,
                }));
            }
            Expression::Constant(_) => {}
            Expression::Combined(c) => c.terms.iter().for_each(|t| t.collect_paths(out)),
            Expression::Negated(inner) => inner.collect_paths(out),
        }
    }

    fn join(self, conjunction: Conjunction, rest: impl Iterator<Item = Expression>) -> Expression {
        let mut terms = Vec::new();
        push_term(&mut terms, conjunction, self);
        for term in rest {
            push_term(&mut terms, conjunction, term);
        }
        if terms.len() == 1 {
            if let Some(only) = terms.pop() {
                return only;
            }
        }
        Expression::Combined(Combined { conjunction, terms })
    }
}

fn push_term(terms: &mut Vec<Expression>, conjunction: Conjunction, term: Expression) {
    match term {
        Expression::Combined(c) if c.conjunction == conjunction && conjunction.is_associative() => {
            terms.extend(c.terms);
        }
        other => terms.push(other),
    }
}

impl BitAnd for Expression {
    type Output = Expression;

    fn bitand(self, rhs: Expression) -> Expression {
        self.join(Conjunction::And, std::iter::once(rhs))
    }
}

impl BitOr for Expression {
    type Output = Expression;

    fn bitor(self, rhs: Expression) -> Expression {
        self.join(Conjunction::Or, std::iter::once(rhs))
    }
}

impl Not for Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        self.negate()
    }
}

/// Renders with the default options; parameters are dropped.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &RenderOptions::default()).sql)
    }
}
