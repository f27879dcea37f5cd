//! # predql
//!
//! Composable predicate expressions and a SELECT / UPDATE / DELETE builder
//! that renders them into parameterized statement text.
//!
//! ## Features
//!
//! - **Immutable expression trees**: comparisons, AND/OR/NAND/NOR and negation
//! - **Bracket minimization**: parentheses only where precedence needs them
//! - **Negative conjunctions**: NAND/NOR rendered as `NOT (...)` around AND/OR
//! - **Continuous numbering**: `?N` placeholders follow emission order across clauses
//! - **Build-time errors**: empty combinations, arity mismatches and missing SET
//!   pairs fail at the builder call, never while rendering
//! - **Transaction-friendly execution**: anything implementing [`GenericClient`]
//!
//! ## Example
//!
//! ```ignore
//! use predql::prelude::*;
//!
//! #[derive(Entity, FromRow)]
//! #[predql(backing = "ContactEntity", rename_all = "camelCase")]
//! struct Contact {
//!     first_name: String,
//!     last_name: String,
//!     age: i32,
//! }
//!
//! let c = alias::from::<Contact>().named("c")?;
//! let (first, last, age) = (c.to("firstName")?, c.to("lastName")?, c.to("age")?);
//!
//! // SELECT
//! let query = select_from(&c)
//!     .filter([first.eq("Peter") & (last.like("%Pan") | age.between(18, 42))])?
//!     .order_by(&age)?
//!     .query();
//!
//! // UPDATE
//! update(&c)
//!     .set(&first, &last)?
//!     .set(&age, 60)?
//!     .filter([last.like("%Pan_")])?
//!     .execute(&client)
//!     .await?;
//!
//! // DELETE
//! delete_from(&c)
//!     .filter([first.like("%Pan_"), age.geq(60)])?
//!     .execute(&client)
//!     .await?;
//! ```

pub mod alias;
pub mod client;
pub mod error;
pub mod expr;
mod ident;
pub mod prelude;
pub mod row;
pub mod stmt;
pub mod value;

pub use alias::{Entity, EntityAlias, Path, Property, Prototype};
pub use client::{GenericClient, RowStream, StreamingClient};
pub use error::{QueryError, QueryResult};
pub use expr::{
    Argument, Bracketing, Conjunction, Dialect, Expression, IntoArgument, Operator, Record,
    RenderOptions, render,
};
pub use row::{FromRow, RowExt};
pub use stmt::{
    DeleteStatement, MutationQuery, SelectQuery, SelectStatement, UpdateStatement, delete_from,
    select_from, update,
};
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "derive")]
pub use predql_derive::{Entity, FromRow};

// Referenced by derive-generated code.
#[doc(hidden)]
pub use tokio_postgres;
