//! Convenient imports for typical `predql` usage.
//!
//! ```ignore
//! use predql::prelude::*;
//! ```

pub use crate::alias;
pub use crate::{
    Bracketing, Conjunction, Dialect, Entity, EntityAlias, Expression, FromRow, GenericClient,
    Path, QueryError, QueryResult, RenderOptions, RowExt, Value, delete_from, select_from,
    update,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
