//! Execution through a recording `GenericClient`.

use futures_util::StreamExt;
use predql::prelude::*;
use predql::{Property, QueryError, RowStream, StreamingClient};
use std::sync::Mutex;
use std::time::Duration;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug)]
struct Contact;

impl predql::Entity for Contact {
    const BACKING: &'static str = "ContactEntity";
    const PROPERTIES: &'static [Property] = &[
        Property::named("firstName"),
        Property::named("lastName"),
        Property::named("age"),
    ];
}

impl FromRow for Contact {
    fn from_row(_row: &Row) -> QueryResult<Self> {
        Ok(Contact)
    }
}

/// Records every statement it receives and reports `affected` rows.
#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    affected: u64,
}

impl RecordingClient {
    fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) {
        let params = params.iter().map(|p| format!("{p:?}")).collect();
        self.calls.lock().unwrap().push((sql.to_string(), params));
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        self.record(sql, params);
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        self.record(sql, params);
        Ok(self.affected)
    }
}

impl StreamingClient for RecordingClient {
    async fn query_stream(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> QueryResult<RowStream> {
        self.record(sql, params);
        let rows: Vec<QueryResult<Row>> = vec![Err(QueryError::Other("connection reset".into()))];
        Ok(RowStream::new(futures_util::stream::iter(rows)))
    }
}

struct HangingClient;

impl GenericClient for HangingClient {
    async fn query(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn execute(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(0)
    }
}

impl StreamingClient for HangingClient {
    async fn query_stream(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> QueryResult<RowStream> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(RowStream::new(futures_util::stream::empty()))
    }
}

fn contact() -> EntityAlias<Contact> {
    alias::from::<Contact>().named("c").unwrap()
}

#[tokio::test]
async fn update_sends_text_and_ordered_params() -> QueryResult<()> {
    let client = RecordingClient {
        affected: 3,
        ..Default::default()
    };
    let c = contact();
    let (first, last, age) = (c.to("firstName")?, c.to("lastName")?, c.to("age")?);

    let affected = update(&c)
        .filter([last.like("%Pan_")])?
        .set(&first, &last)?
        .set(&age, 60)?
        .execute(&client)
        .await?;

    assert_eq!(affected, 3);
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        "UPDATE ContactEntity AS c SET c.firstName = c.lastName, c.age = ?1 WHERE c.lastName LIKE ?2"
    );
    assert_eq!(calls[0].1, vec!["Int(60)", "Text(\"%Pan_\")"]);
    Ok(())
}

#[tokio::test]
async fn missing_set_never_reaches_the_client() {
    let client = RecordingClient::default();
    let c = contact();
    let err = update(&c).execute(&client).await.unwrap_err();
    assert!(matches!(err, QueryError::MissingSet));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn compiled_mutation_can_run_repeatedly() -> QueryResult<()> {
    let client = RecordingClient {
        affected: 1,
        ..Default::default()
    };
    let c = contact();
    let q = delete_from(&c)
        .filter([c.to("firstName")?.like("%Pan_"), c.to("age")?.geq(60)])?
        .compile();

    assert_eq!(q.execute(&client).await?, 1);
    assert_eq!(q.execute(&client).await?, 1);

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(
        calls[0].0,
        "DELETE FROM ContactEntity AS c WHERE c.firstName LIKE ?1 AND c.age >= ?2"
    );
    Ok(())
}

#[tokio::test]
async fn select_maps_rows_and_reports_missing_rows() -> QueryResult<()> {
    let client = RecordingClient::default();
    let c = contact();
    let q = select_from(&c).filter([c.to("age")?.gt(18)])?.query();

    let rows = q.execute(&client).await?;
    assert!(rows.is_empty());
    assert!(q.fetch_opt(&client).await?.is_none());

    let err = q.fetch_one(&client).await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(client.calls().len(), 3);
    assert_eq!(
        client.calls()[0].0,
        "SELECT c FROM ContactEntity AS c WHERE c.age > ?1"
    );
    Ok(())
}

#[tokio::test]
async fn timeout_returns_error() -> QueryResult<()> {
    let c = contact();

    let err = delete_from(&c)
        .timeout(Duration::from_millis(10))
        .execute(&HangingClient)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Timeout(d) if d == Duration::from_millis(10)));
    assert!(err.is_timeout());

    let q = select_from(&c)
        .timeout(Duration::from_millis(10))
        .filter([c.to("age")?.gt(1)])?
        .query();
    let err = q.execute(&HangingClient).await.unwrap_err();
    assert!(err.is_timeout());
    Ok(())
}

#[tokio::test]
async fn fast_statements_beat_the_timeout() -> QueryResult<()> {
    let client = RecordingClient {
        affected: 7,
        ..Default::default()
    };
    let c = contact();
    let affected = delete_from(&c)
        .timeout(Duration::from_secs(5))
        .execute(&client)
        .await?;
    assert_eq!(affected, 7);
    Ok(())
}

#[tokio::test]
async fn stream_passes_row_errors_through_and_ends() -> QueryResult<()> {
    let client = RecordingClient::default();
    let c = contact();
    let q = select_from(&c)
        .filter([c.to("lastName")?.like("%Pan"), c.to("age")?.lt(40)])?
        .order_by(&c.to("age")?)?
        .query();

    let mut rows = q.stream(&client).await?;
    let first = rows.next().await.expect("one item");
    assert!(matches!(first, Err(QueryError::Other(ref m)) if m == "connection reset"));
    assert!(rows.next().await.is_none());

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        "SELECT c FROM ContactEntity AS c WHERE c.lastName LIKE ?1 AND c.age < ?2 ORDER BY c.age"
    );
    assert_eq!(calls[0].1, vec!["Text(\"%Pan\")", "Int(40)"]);
    Ok(())
}

#[tokio::test]
async fn stream_open_respects_timeout() {
    let c = contact();
    let err = select_from(&c)
        .timeout(Duration::from_millis(10))
        .query()
        .stream(&HangingClient)
        .await
        .err()
        .expect("timed out");
    assert!(err.is_timeout());
}
