//! Composable predicate expressions and their rendering.
//!
//! This module provides:
//! - [`Expression`]: an immutable tree of comparisons, conjunctions and negations
//! - [`Formatter`]: the single-pass renderer that writes text and numbers parameters
//! - [`Bracketing`]: how many parentheses to emit around nested conjunctions
//!
//! Rendering never fails once a tree is built; every error (empty combination,
//! operator arity) is raised by the constructor that caused it.
//!
//! # Usage
//!
//! ```ignore
//! use predql::expr::{render, Bracketing, RenderOptions};
//!
//! let e = first.eq("Peter") & (last.like("%Pan") | age.between(18, 42));
//! let out = render(&e, &RenderOptions::new().bracketing(Bracketing::Minimal));
//! assert_eq!(
//!     out.sql,
//!     "c.firstName = ?1 AND (c.lastName LIKE ?2 OR c.age BETWEEN ?3 AND ?4)"
//! );
//! ```

mod argument;
mod conjunction;
mod eval;
mod expression;
mod format;
mod operator;
mod param;

pub use argument::{Argument, IntoArgument};
pub use conjunction::Conjunction;
pub use eval::Record;
pub use expression::{Combined, Comparison, Expression};
pub use format::{Bracketing, Dialect, Formatter, RenderOptions, Rendered, render};
pub use operator::{Arity, Operator};
pub use param::ParamList;
