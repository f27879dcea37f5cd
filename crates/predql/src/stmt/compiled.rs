//! Compiled statements: rendered text, bound parameters and execution.

use crate::client::{GenericClient, RowStream, StreamingClient};
use crate::error::{QueryError, QueryResult};
use crate::expr::{ParamList, Rendered};
use crate::row::FromRow;
use crate::value::Value;
use futures_core::Stream;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// Which statement a compiled query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered once, executable any number of times.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledStatement {
    kind: StatementKind,
    sql: String,
    params: ParamList,
    timeout: Option<Duration>,
}

impl CompiledStatement {
    pub(crate) fn new(kind: StatementKind, rendered: Rendered, timeout: Option<Duration>) -> Self {
        Self {
            kind,
            sql: rendered.sql,
            params: rendered.params,
            timeout,
        }
    }

    fn trace(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "predql.sql",
            kind = self.kind.as_str(),
            sql = %self.sql,
            params = self.params.len(),
            "executing statement"
        );
    }

    async fn run<C, T, F>(&self, conn: &C, future: F) -> QueryResult<T>
    where
        C: GenericClient + ?Sized,
        F: Future<Output = QueryResult<T>>,
    {
        self.trace();
        with_timeout(conn, self.timeout, &self.sql, future).await
    }
}

/// Race `future` against `timeout`.
///
/// On expiry a cancel request is sent through the connection's cancel token
/// in the background and [`QueryError::Timeout`] is returned.
async fn with_timeout<C, T, F>(
    conn: &C,
    timeout: Option<Duration>,
    sql: &str,
    future: F,
) -> QueryResult<T>
where
    C: GenericClient + ?Sized,
    F: Future<Output = QueryResult<T>>,
{
    let Some(timeout) = timeout else {
        return future.await;
    };

    tokio::pin!(future);
    tokio::select! {
        result = &mut future => result,
        _ = tokio::time::sleep(timeout) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "predql.sql", ?timeout, sql, "statement timed out, cancelling");
            #[cfg(not(feature = "tracing"))]
            let _ = sql;

            if let Some(cancel_token) = conn.cancel_token() {
                tokio::spawn(async move {
                    let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                });
            }
            Err(QueryError::Timeout(timeout))
        }
    }
}

/// A compiled SELECT whose rows map to `R`.
pub struct SelectQuery<R> {
    statement: CompiledStatement,
    _row: PhantomData<fn() -> R>,
}

impl<R> SelectQuery<R> {
    pub(crate) fn new(statement: CompiledStatement) -> Self {
        Self {
            statement,
            _row: PhantomData,
        }
    }

    pub fn sql(&self) -> &str {
        &self.statement.sql
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[Value] {
        self.statement.params.values()
    }

    pub fn kind(&self) -> StatementKind {
        self.statement.kind
    }
}

impl<R: FromRow> SelectQuery<R> {
    /// Run the query and map every row.
    pub async fn execute(&self, conn: &impl GenericClient) -> QueryResult<Vec<R>> {
        let params = self.statement.params.as_refs();
        let rows = self
            .statement
            .run(conn, conn.query(&self.statement.sql, &params))
            .await?;
        rows.iter().map(R::from_row).collect()
    }

    /// First row; [`QueryError::NotFound`] when there is none.
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> QueryResult<R> {
        self.fetch_opt(conn)
            .await?
            .ok_or_else(|| QueryError::not_found("SELECT returned no rows"))
    }

    /// First row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> QueryResult<Option<R>> {
        let params = self.statement.params.as_refs();
        let row = self
            .statement
            .run(conn, conn.query_opt(&self.statement.sql, &params))
            .await?;
        row.as_ref().map(R::from_row).transpose()
    }

    /// Lazily mapped rows.
    ///
    /// The timeout covers opening the stream, not consuming it.
    pub async fn stream(&self, conn: &impl StreamingClient) -> QueryResult<RowMapStream<R>> {
        let params = self.statement.params.as_refs();
        let rows = self
            .statement
            .run(conn, conn.query_stream(&self.statement.sql, &params))
            .await?;
        Ok(RowMapStream {
            rows,
            _row: PhantomData,
        })
    }
}

impl<R> Clone for SelectQuery<R> {
    fn clone(&self) -> Self {
        Self::new(self.statement.clone())
    }
}

impl<R> fmt::Debug for SelectQuery<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectQuery")
            .field("sql", &self.statement.sql)
            .field("params", &self.statement.params)
            .finish()
    }
}

/// A compiled UPDATE or DELETE.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationQuery {
    statement: CompiledStatement,
}

impl MutationQuery {
    pub(crate) fn new(statement: CompiledStatement) -> Self {
        Self { statement }
    }

    pub fn sql(&self) -> &str {
        &self.statement.sql
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[Value] {
        self.statement.params.values()
    }

    pub fn kind(&self) -> StatementKind {
        self.statement.kind
    }

    /// Run the statement and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> QueryResult<u64> {
        let params = self.statement.params.as_refs();
        self.statement
            .run(conn, conn.execute(&self.statement.sql, &params))
            .await
    }
}

/// Stream of rows mapped through [`FromRow`].
#[must_use]
pub struct RowMapStream<R> {
    rows: RowStream,
    _row: PhantomData<fn() -> R>,
}

impl<R: FromRow> Stream for RowMapStream<R> {
    type Item = QueryResult<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.rows).poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => Poll::Ready(Some(R::from_row(&row))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
