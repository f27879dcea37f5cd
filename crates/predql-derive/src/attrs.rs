//! Parsing of `#[predql(...)]` attributes shared by `Entity` and `FromRow`.

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use syn::{Data, DeriveInput, Fields, Result};

/// Case conversion applied to field names to obtain property names.
#[derive(Clone, Copy)]
pub(crate) enum RenameAll {
    Lower,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
}

impl RenameAll {
    fn parse(lit: &syn::LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "camelCase" => Ok(Self::Camel),
            "PascalCase" => Ok(Self::Pascal),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            other => Err(syn::Error::new_spanned(
                lit,
                format!("unsupported rename_all rule `{other}`"),
            )),
        }
    }

    fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
        }
    }
}

/// Struct-level `#[predql(backing = "...", rename_all = "...")]`.
#[derive(Default)]
pub(crate) struct ContainerAttr {
    pub backing: Option<String>,
    pub rename_all: Option<RenameAll>,
}

/// Field-level `#[predql(property = "...", column = "...", skip)]`.
#[derive(Default)]
struct FieldAttr {
    property: Option<String>,
    column: Option<String>,
    skip: bool,
}

impl syn::parse::Parse for ContainerAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;

            if ident == "backing" {
                attr.backing = Some(value.value());
            } else if ident == "rename_all" {
                attr.rename_all = Some(RenameAll::parse(&value)?);
            } else {
                return Err(syn::Error::new_spanned(
                    ident,
                    "expected `backing` or `rename_all`",
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }
        Ok(attr)
    }
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "skip" {
                attr.skip = true;
            } else {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                if ident == "property" {
                    attr.property = Some(value.value());
                } else if ident == "column" {
                    attr.column = Some(value.value());
                } else {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "expected `property`, `column` or `skip`",
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }
        Ok(attr)
    }
}

/// One struct field after attribute resolution.
pub(crate) struct FieldInfo {
    pub ident: syn::Ident,
    /// Property name used in `alias.to(...)`.
    pub property: String,
    /// Backing field / column name.
    pub column: String,
    pub skip: bool,
}

pub(crate) fn container_attr(input: &DeriveInput) -> Result<ContainerAttr> {
    let mut out = ContainerAttr::default();
    for attr in &input.attrs {
        if attr.path().is_ident("predql") {
            let parsed: ContainerAttr = attr.parse_args()?;
            if parsed.backing.is_some() {
                out.backing = parsed.backing;
            }
            if parsed.rename_all.is_some() {
                out.rename_all = parsed.rename_all;
            }
        }
    }
    Ok(out)
}

/// Resolve every named field of a struct.
pub(crate) fn fields(input: &DeriveInput, derive: &str) -> Result<Vec<FieldInfo>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    format!("{derive} can only be derived for structs with named fields"),
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs"),
            ));
        }
    };

    let container = container_attr(input)?;
    let mut out = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };

        let mut attr = FieldAttr::default();
        for a in &field.attrs {
            if a.path().is_ident("predql") {
                let parsed: FieldAttr = a.parse_args()?;
                attr.skip |= parsed.skip;
                if parsed.property.is_some() {
                    attr.property = parsed.property;
                }
                if parsed.column.is_some() {
                    attr.column = parsed.column;
                }
            }
        }

        let raw = ident.to_string();
        let raw = raw.strip_prefix("r#").unwrap_or(&raw);
        let property = attr.property.unwrap_or_else(|| match container.rename_all {
            Some(rule) => rule.apply(raw),
            None => raw.to_string(),
        });
        let column = attr.column.unwrap_or_else(|| property.clone());

        out.push(FieldInfo {
            ident,
            property,
            column,
            skip: attr.skip,
        });
    }
    Ok(out)
}
