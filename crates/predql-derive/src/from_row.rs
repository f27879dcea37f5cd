//! FromRow derive macro implementation

use crate::attrs::fields;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_extracts: Vec<_> = fields(&input, "FromRow")?
        .into_iter()
        .map(|f| {
            let ident = &f.ident;
            if f.skip {
                quote! { #ident: ::core::default::Default::default() }
            } else {
                let column = &f.column;
                quote! { #ident: row.try_get_column(#column)? }
            }
        })
        .collect();

    Ok(quote! {
        impl #impl_generics ::predql::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::predql::tokio_postgres::Row) -> ::predql::QueryResult<Self> {
                use ::predql::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
