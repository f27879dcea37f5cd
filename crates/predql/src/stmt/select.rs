//! SELECT statement builder.

use super::compiled::{CompiledStatement, SelectQuery, StatementKind};
use super::{Scope, render_option_setters};
use crate::alias::Path;
use crate::error::QueryResult;
use crate::expr::{Dialect, Expression};
use std::fmt;
use std::marker::PhantomData;

/// SELECT over one alias with rows mapped to `R`.
pub struct SelectStatement<R> {
    scope: Scope,
    order_by: Vec<Path>,
    _row: PhantomData<fn() -> R>,
}

impl<R> SelectStatement<R> {
    pub(crate) fn new(scope: Scope) -> Self {
        Self {
            scope,
            order_by: Vec::new(),
            _row: PhantomData,
        }
    }

    /// Add WHERE terms, AND-composed with each other and with earlier calls.
    pub fn filter(mut self, terms: impl IntoIterator<Item = Expression>) -> QueryResult<Self> {
        self.scope.add_filter(terms)?;
        Ok(self)
    }

    /// Append an ascending ordering term.
    pub fn order_by(mut self, path: &Path) -> QueryResult<Self> {
        self.scope.check_path(path)?;
        self.order_by.push(path.clone());
        Ok(self)
    }

    render_option_setters!();

    /// Render the statement once into an executable query.
    pub fn query(self) -> SelectQuery<R> {
        let mut f = self.scope.formatter();
        f.write_str("SELECT ");
        f.write_str(self.scope.alias_name());
        if f.options().dialect == Dialect::Postgres {
            f.write_str(".*");
        }
        f.write_str(" FROM ");
        self.scope.write_target(&mut f);
        self.scope.write_filter(&mut f);

        for (i, path) in self.order_by.iter().enumerate() {
            f.write_str(if i == 0 { " ORDER BY " } else { ", " });
            f.write_path(path);
        }

        SelectQuery::new(CompiledStatement::new(
            StatementKind::Select,
            f.finish(),
            self.scope.timeout(),
        ))
    }
}

impl<R> fmt::Debug for SelectStatement<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectStatement")
            .field("scope", &self.scope)
            .field("order_by", &self.order_by)
            .finish()
    }
}
