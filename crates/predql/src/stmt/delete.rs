//! DELETE statement builder.

use super::compiled::{CompiledStatement, MutationQuery, StatementKind};
use super::{Scope, render_option_setters};
use crate::client::GenericClient;
use crate::error::QueryResult;
use crate::expr::Expression;

/// DELETE over one alias.
///
/// Without a filter every row of the backing type is deleted.
#[derive(Debug, Clone)]
pub struct DeleteStatement {
    scope: Scope,
}

impl DeleteStatement {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// Add WHERE terms, AND-composed with each other and with earlier calls.
    pub fn filter(mut self, terms: impl IntoIterator<Item = Expression>) -> QueryResult<Self> {
        self.scope.add_filter(terms)?;
        Ok(self)
    }

    render_option_setters!();

    /// Render the statement once.
    pub fn compile(self) -> MutationQuery {
        let mut f = self.scope.formatter();
        f.write_str("DELETE FROM ");
        self.scope.write_target(&mut f);
        self.scope.write_filter(&mut f);
        MutationQuery::new(CompiledStatement::new(
            StatementKind::Delete,
            f.finish(),
            self.scope.timeout(),
        ))
    }

    /// Compile and run; returns the affected row count.
    pub async fn execute(self, conn: &impl GenericClient) -> QueryResult<u64> {
        self.compile().execute(conn).await
    }
}
