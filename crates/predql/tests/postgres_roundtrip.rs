//! Round trip against a live PostgreSQL (set `DATABASE_URL`).

use futures_util::StreamExt;
use predql::prelude::*;

#[derive(Debug, Entity, FromRow)]
#[predql(rename_all = "camelCase")]
struct Contact {
    #[predql(column = "first_name")]
    first_name: String,
    #[predql(column = "last_name")]
    last_name: String,
    age: i32,
}

#[tokio::test]
async fn select_update_delete_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping select_update_delete_roundtrip");
            return Ok(());
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });

    client
        .batch_execute(
            "CREATE TEMP TABLE predql_contacts (
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                age INT NOT NULL
            );
            INSERT INTO predql_contacts VALUES
                ('Peter', 'Pan', 12),
                ('Wendy', 'Darling', 13),
                ('Peter', 'Parker', 30),
                ('Tinker', 'Pane', 100);",
        )
        .await?;

    let c = alias::from::<Contact>()
        .backing("predql_contacts")
        .named("c")?;
    let (first, last, age) = (
        c.to(Contact::PROP_FIRST_NAME)?,
        c.to(Contact::PROP_LAST_NAME)?,
        c.to(Contact::PROP_AGE)?,
    );

    let found = select_from(&c)
        .dialect(Dialect::Postgres)
        .filter([first.eq("Peter") & (last.like("%Pan") | age.between(18, 42))])?
        .order_by(&age)?
        .query()
        .execute(&client)
        .await?;
    let names: Vec<_> = found.iter().map(|r| r.last_name.as_str()).collect();
    assert_eq!(names, vec!["Pan", "Parker"]);

    let updated = update(&c)
        .dialect(Dialect::Postgres)
        .filter([last.like("%Pan_")])?
        .set(&first, &last)?
        .set(&age, 60)?
        .execute(&client)
        .await?;
    assert_eq!(updated, 1);

    let deleted = delete_from(&c)
        .dialect(Dialect::Postgres)
        .filter([first.like("%Pan_"), age.geq(60)])?
        .execute(&client)
        .await?;
    assert_eq!(deleted, 1);

    let remaining = select_from(&c)
        .dialect(Dialect::Postgres)
        .order_by(&age)?
        .query()
        .stream(&client)
        .await?;
    let rows: Vec<Contact> = remaining
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<QueryResult<_>>()?;
    let remaining: Vec<_> = rows
        .iter()
        .map(|r| (r.first_name.as_str(), r.age))
        .collect();
    assert_eq!(remaining, vec![("Peter", 12), ("Wendy", 13), ("Peter", 30)]);

    Ok(())
}
