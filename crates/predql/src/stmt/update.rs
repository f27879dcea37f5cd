//! UPDATE statement builder.

use super::compiled::{CompiledStatement, MutationQuery, StatementKind};
use super::{Scope, render_option_setters};
use crate::alias::Path;
use crate::client::GenericClient;
use crate::error::{QueryError, QueryResult};
use crate::expr::{Argument, Dialect, Expression, IntoArgument};

/// UPDATE over one alias.
///
/// At least one [`set`](Self::set) is required before compiling.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    scope: Scope,
    assignments: Vec<(Path, Argument)>,
}

impl UpdateStatement {
    pub(crate) fn new(scope: Scope) -> Self {
        Self {
            scope,
            assignments: Vec::new(),
        }
    }

    /// Append `path = value`. SET pairs render in insertion order.
    ///
    /// `value` may be a literal or another path of the same alias.
    pub fn set(mut self, path: &Path, value: impl IntoArgument) -> QueryResult<Self> {
        self.scope.check_path(path)?;
        let value = value.into_argument();
        self.scope.check_argument(&value)?;
        self.assignments.push((path.clone(), value));
        Ok(self)
    }

    /// Add WHERE terms, AND-composed with each other and with earlier calls.
    pub fn filter(mut self, terms: impl IntoIterator<Item = Expression>) -> QueryResult<Self> {
        self.scope.add_filter(terms)?;
        Ok(self)
    }

    render_option_setters!();

    /// Render the statement once.
    ///
    /// Fails with [`QueryError::MissingSet`] when no SET pair was added.
    pub fn compile(self) -> QueryResult<MutationQuery> {
        if self.assignments.is_empty() {
            return Err(QueryError::MissingSet);
        }

        let mut f = self.scope.formatter();
        f.write_str("UPDATE ");
        self.scope.write_target(&mut f);
        for (i, (path, value)) in self.assignments.iter().enumerate() {
            f.write_str(if i == 0 { " SET " } else { ", " });
            // PostgreSQL rejects alias-qualified SET targets.
            match f.options().dialect {
                Dialect::Entity => f.write_path(path),
                Dialect::Postgres => f.write_str(path.field()),
            }
            f.write_str(" = ");
            f.write_argument(value);
        }
        self.scope.write_filter(&mut f);

        Ok(MutationQuery::new(CompiledStatement::new(
            StatementKind::Update,
            f.finish(),
            self.scope.timeout(),
        )))
    }

    /// Compile and run; returns the affected row count.
    pub async fn execute(self, conn: &impl GenericClient) -> QueryResult<u64> {
        self.compile()?.execute(conn).await
    }
}
