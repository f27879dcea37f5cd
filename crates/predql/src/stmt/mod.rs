//! Statement builders: SELECT, UPDATE and DELETE over one entity alias.
//!
//! A builder accumulates filter terms, SET pairs and ordering paths, then is
//! consumed into a compiled statement that is rendered exactly once. All
//! clauses of a statement are written through a single [`Formatter`], so the
//! positional parameters are numbered continuously (SET before WHERE, WHERE
//! before ORDER BY).
//!
//! Builders are plain values and are not meant to be shared across tasks
//! while they are being filled in.
//!
//! # Example
//!
//! ```ignore
//! use predql::{alias, select_from};
//!
//! let c = alias::from::<Contact>().named("c")?;
//! let (first, last, age) = (c.to("firstName")?, c.to("lastName")?, c.to("age")?);
//!
//! let query = select_from(&c)
//!     .filter([first.eq("Peter") & (last.like("%Pan") | age.between(18, 42))])?
//!     .order_by(&age)?
//!     .query();
//!
//! assert_eq!(
//!     query.sql(),
//!     "SELECT c FROM ContactEntity AS c WHERE c.firstName = ?1 AND (c.lastName LIKE ?2 OR c.age BETWEEN ?3 AND ?4) ORDER BY c.age"
//! );
//! ```

mod compiled;
mod delete;
mod select;
mod update;

pub use compiled::{MutationQuery, RowMapStream, SelectQuery, StatementKind};
pub use delete::DeleteStatement;
pub use select::SelectStatement;
pub use update::UpdateStatement;

use crate::alias::{AliasBinding, EntityAlias, Path};
use crate::error::QueryResult;
use crate::expr::{Argument, Expression, Formatter, RenderOptions};
use std::sync::Arc;
use std::time::Duration;

/// Start a SELECT over `alias`; rows are mapped to the alias's row type.
pub fn select_from<E, R>(alias: &EntityAlias<E, R>) -> SelectStatement<R> {
    SelectStatement::new(Scope::new(alias))
}

/// Start an UPDATE over `alias`.
pub fn update<E, R>(alias: &EntityAlias<E, R>) -> UpdateStatement {
    UpdateStatement::new(Scope::new(alias))
}

/// Start a DELETE over `alias`.
pub fn delete_from<E, R>(alias: &EntityAlias<E, R>) -> DeleteStatement {
    DeleteStatement::new(Scope::new(alias))
}

/// State shared by every statement kind: the bound alias, the accumulated
/// filter and the render/execution options.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    binding: Arc<AliasBinding>,
    filter: Option<Expression>,
    options: RenderOptions,
    timeout: Option<Duration>,
}

impl Scope {
    fn new<E, R>(alias: &EntityAlias<E, R>) -> Self {
        Self {
            binding: Arc::clone(alias.binding()),
            filter: None,
            options: RenderOptions::default(),
            timeout: None,
        }
    }

    /// Fail unless `path` was created from this statement's alias.
    pub(crate) fn check_path(&self, path: &Path) -> QueryResult<()> {
        path.check_bound(&self.binding)
    }

    pub(crate) fn check_argument(&self, argument: &Argument) -> QueryResult<()> {
        match argument {
            Argument::Reference(path) => self.check_path(path),
            Argument::Literal(_) => Ok(()),
        }
    }

    /// AND `terms` into the filter. Repeated calls keep AND-composing.
    pub(crate) fn add_filter(
        &mut self,
        terms: impl IntoIterator<Item = Expression>,
    ) -> QueryResult<()> {
        let added = Expression::all(terms)?;
        for path in added.paths() {
            self.check_path(path)?;
        }
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing & added,
            None => added,
        });
        Ok(())
    }

    pub(crate) fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn formatter(&self) -> Formatter {
        Formatter::new(self.options)
    }

    /// `<backing> AS <alias>`
    pub(crate) fn write_target(&self, f: &mut Formatter) {
        f.write_str(&self.binding.backing);
        f.write_str(" AS ");
        f.write_str(&self.binding.name);
    }

    pub(crate) fn alias_name(&self) -> &str {
        &self.binding.name
    }

    /// ` WHERE <expr>` when a filter was given.
    pub(crate) fn write_filter(&self, f: &mut Formatter) {
        if let Some(filter) = &self.filter {
            f.write_str(" WHERE ");
            f.write_expression(filter);
        }
    }
}

/// Render-option setters shared by the three builders.
macro_rules! render_option_setters {
    () => {
        /// Replace all render options at once.
        pub fn options(mut self, options: $crate::expr::RenderOptions) -> Self {
            *self.scope.options_mut() = options;
            self
        }

        pub fn bracketing(mut self, bracketing: $crate::expr::Bracketing) -> Self {
            self.scope.options_mut().bracketing = bracketing;
            self
        }

        pub fn resolve_negative_conjunctions(mut self, resolve: bool) -> Self {
            self.scope.options_mut().resolve_negative_conjunctions = resolve;
            self
        }

        pub fn dialect(mut self, dialect: $crate::expr::Dialect) -> Self {
            self.scope.options_mut().dialect = dialect;
            self
        }

        /// Race execution against `timeout`; on expiry the backend query is
        /// cancelled and [`QueryError::Timeout`](crate::QueryError::Timeout)
        /// is returned.
        pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
            self.scope.set_timeout(timeout);
            self
        }
    };
}

pub(crate) use render_option_setters;
