//! Derive macros for predql
//!
//! Provides `#[derive(Entity)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod from_row;

/// Derive the `Entity` binding metadata for a struct.
///
/// # Example
///
/// ```ignore
/// use predql::Entity;
///
/// #[derive(Entity)]
/// #[predql(backing = "ContactEntity", rename_all = "camelCase")]
/// struct Contact {
///     first_name: String,
///     #[predql(column = "surname")]
///     last_name: String,
///     age: i32,
/// }
///
/// assert_eq!(Contact::PROP_FIRST_NAME, "firstName");
/// ```
///
/// # Generated
///
/// - `impl predql::Entity` with `BACKING` and `PROPERTIES`
/// - `PROP_*: &'static str` - property name constants
///
/// # Attributes
///
/// - `#[predql(backing = "Name")]` - backing type (defaults to the struct name)
/// - `#[predql(rename_all = "camelCase")]` - derive property names from field names;
///   also `lowercase`, `PascalCase`, `snake_case`, `SCREAMING_SNAKE_CASE`
/// - `#[predql(property = "name")]` - explicit property name
/// - `#[predql(column = "name")]` - backing field (defaults to the property name)
/// - `#[predql(skip)]` - not a property
#[proc_macro_derive(Entity, attributes(predql))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` for a struct.
///
/// Each field is read from the column its property is bound to, using the
/// same `#[predql(...)]` attributes as `Entity`. Skipped fields are filled
/// with `Default::default()`.
///
/// ```ignore
/// use predql::FromRow;
///
/// #[derive(FromRow)]
/// struct ContactRow {
///     #[predql(column = "first_name")]
///     first_name: String,
///     age: Option<i32>,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(predql))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
