//! Entity derive macro implementation

use crate::attrs::{container_attr, fields};
use heck::ToShoutySnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let backing = container_attr(&input)?
        .backing
        .unwrap_or_else(|| name.to_string());
    let fields: Vec<_> = fields(&input, "Entity")?
        .into_iter()
        .filter(|f| !f.skip)
        .collect();

    let properties = fields.iter().map(|f| {
        let property = &f.property;
        let column = &f.column;
        quote! { ::predql::Property::new(#property, #column) }
    });

    let consts = fields.iter().map(|f| {
        let ident = f.ident.to_string();
        let const_name = format_ident!(
            "PROP_{}",
            ident.strip_prefix("r#").unwrap_or(&ident).to_shouty_snake_case()
        );
        let property = &f.property;
        quote! { pub const #const_name: &'static str = #property; }
    });

    Ok(quote! {
        impl #impl_generics ::predql::Entity for #name #ty_generics #where_clause {
            const BACKING: &'static str = #backing;
            const PROPERTIES: &'static [::predql::Property] = &[#(#properties),*];
        }

        impl #impl_generics #name #ty_generics #where_clause {
            #(#consts)*
        }
    })
}
