//! Rendering expressions into statement text plus an ordered parameter list.
//!
//! Rendering is a single depth-first, left-to-right pass that only appends.
//! Each literal is pushed onto the [`ParamList`] as it is written, so the
//! placeholder number is always the parameter count after the push and
//! numbering stays consistent across every clause written through one
//! [`Formatter`].

use super::conjunction::Conjunction;
use super::expression::{Comparison, Expression};
use super::operator::Operator;
use super::param::ParamList;
use super::argument::Argument;
use crate::alias::Path;
use crate::value::Value;

/// How many parentheses are emitted around nested terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bracketing {
    /// Wrap every term that is not a leaf comparison.
    All,
    /// Wrap every conjunction term regardless of precedence.
    Inner,
    /// Wrap a conjunction term only when its parent binds tighter.
    #[default]
    Minimal,
}

/// Target text flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Entity query text: `?N` placeholders, `SELECT c`, `SET c.field`.
    #[default]
    Entity,
    /// PostgreSQL text: `$N` placeholders, `SELECT c.*`, `SET field`.
    Postgres,
}

impl Dialect {
    fn placeholder_prefix(self) -> char {
        match self {
            Dialect::Entity => '?',
            Dialect::Postgres => '$',
        }
    }
}

/// Options passed explicitly to every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub bracketing: Bracketing,
    /// Rewrite NAND/NOR as `NOT (...)` around AND/OR and cancel double negation.
    pub resolve_negative_conjunctions: bool,
    pub dialect: Dialect,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bracketing: Bracketing::Minimal,
            resolve_negative_conjunctions: true,
            dialect: Dialect::Entity,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bracketing(mut self, bracketing: Bracketing) -> Self {
        self.bracketing = bracketing;
        self
    }

    pub fn resolve_negative_conjunctions(mut self, resolve: bool) -> Self {
        self.resolve_negative_conjunctions = resolve;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

/// Rendered text and the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub params: ParamList,
}

/// Render a single expression as a top-level predicate.
pub fn render(expression: &Expression, options: &RenderOptions) -> Rendered {
    let mut formatter = Formatter::new(*options);
    formatter.write_expression(expression);
    formatter.finish()
}

/// Shape of a node after negation resolution.
enum View<'a> {
    Comparison(&'a Comparison),
    Constant(bool),
    Combined(Conjunction, &'a [Expression]),
    Not(Box<View<'a>>),
}

impl<'a> View<'a> {
    fn of(expression: &'a Expression, resolve: bool) -> Self {
        match expression {
            Expression::Comparison(c) => View::Comparison(c),
            Expression::Constant(v) => View::Constant(*v),
            Expression::Combined(c) if resolve && c.conjunction().is_negation() => View::Not(
                Box::new(View::Combined(c.conjunction().positive(), c.terms())),
            ),
            Expression::Combined(c) => View::Combined(c.conjunction(), c.terms()),
            Expression::Negated(inner) if resolve => match inner.as_ref() {
                Expression::Negated(twice) => View::of(twice, resolve),
                Expression::Combined(c) if c.conjunction().is_negation() => {
                    View::Combined(c.conjunction().positive(), c.terms())
                }
                other => View::Not(Box::new(View::of(other, resolve))),
            },
            Expression::Negated(inner) => View::Not(Box::new(View::of(inner, resolve))),
        }
    }
}

impl Bracketing {
    fn wraps(self, parent: Conjunction, child: &View<'_>) -> bool {
        match (self, child) {
            (Bracketing::All, View::Comparison(_) | View::Constant(_)) => false,
            (Bracketing::All, _) => true,
            (Bracketing::Inner, child) => matches!(child, View::Combined(..)),
            (Bracketing::Minimal, View::Combined(conjunction, _)) => {
                let (child_rank, parent_rank) = (conjunction.precedence(), parent.precedence());
                // Equal rank with a different conjunction only occurs for literal NAND/NOR.
                child_rank < parent_rank || (child_rank == parent_rank && *conjunction != parent)
            }
            (Bracketing::Minimal, _) => false,
        }
    }
}

/// Append-only writer for one statement.
#[derive(Debug)]
pub struct Formatter {
    options: RenderOptions,
    sql: String,
    params: ParamList,
}

impl Formatter {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            sql: String::new(),
            params: ParamList::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// `alias.field`
    pub fn write_path(&mut self, path: &Path) {
        self.sql.push_str(path.alias());
        self.sql.push('.');
        self.sql.push_str(path.field());
    }

    /// Push `value` as the next parameter and write its placeholder.
    pub fn write_literal(&mut self, value: &Value) {
        let idx = self.params.push(value.clone());
        self.sql.push(self.options.dialect.placeholder_prefix());
        self.sql.push_str(&idx.to_string());
    }

    pub fn write_argument(&mut self, argument: &Argument) {
        match argument {
            Argument::Literal(value) => self.write_literal(value),
            Argument::Reference(path) => self.write_path(path),
        }
    }

    /// Write `expression` as an outermost predicate (never bracketed itself).
    pub fn write_expression(&mut self, expression: &Expression) {
        let view = View::of(expression, self.options.resolve_negative_conjunctions);
        self.write_view(&view);
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            sql: self.sql,
            params: self.params,
        }
    }

    fn write_view(&mut self, view: &View<'_>) {
        match view {
            View::Comparison(c) => self.write_comparison(c),
            View::Constant(true) => self.sql.push_str("1=1"),
            View::Constant(false) => self.sql.push_str("1=0"),
            View::Not(inner) => {
                self.sql.push_str("NOT (");
                self.write_view(inner);
                self.sql.push(')');
            }
            View::Combined(conjunction, terms) => self.write_combined(*conjunction, terms),
        }
    }

    fn write_combined(&mut self, conjunction: Conjunction, terms: &[Expression]) {
        let resolve = self.options.resolve_negative_conjunctions;
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                self.sql.push(' ');
                self.sql.push_str(conjunction.token());
                self.sql.push(' ');
            }
            let child = View::of(term, resolve);
            if self.options.bracketing.wraps(conjunction, &child) {
                self.sql.push('(');
                self.write_view(&child);
                self.sql.push(')');
            } else {
                self.write_view(&child);
            }
        }
    }

    fn write_comparison(&mut self, comparison: &Comparison) {
        let operator = comparison.operator();
        let arguments = comparison.arguments();
        if operator == Operator::In && arguments.is_empty() {
            // `x IN ()` is not valid SQL; an empty membership never matches.
            self.sql.push_str("1=0");
            return;
        }

        self.write_path(comparison.path());
        self.sql.push(' ');
        self.sql.push_str(operator.token());

        let joiner = operator.joiner().unwrap_or(", ");
        if operator == Operator::In {
            self.sql.push_str(" (");
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    self.sql.push_str(joiner);
                }
                self.write_argument(argument);
            }
            self.sql.push(')');
        } else {
            for (i, argument) in arguments.iter().enumerate() {
                self.sql.push_str(if i == 0 { " " } else { joiner });
                self.write_argument(argument);
            }
        }
    }
}
