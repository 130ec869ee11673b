use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt as _;
use syn::spanned::Spanned as _;
use syn::{DeriveInput, Field, Lit};

use crate::attrs::{ColumnAttrs, DefaultValue, TableAttrs};
use crate::utils::{self, ColumnKind};

/// A struct field mapped to a column.
struct Column {
    name: String,
    builder: TokenStream2,
}

/// Generate implementation of `Table` trait.
pub fn table(
    DeriveInput {
        ident,
        data,
        generics,
        attrs,
        ..
    }: DeriveInput,
) -> syn::Result<TokenStream2> {
    let syn::Data::Struct(struct_data) = data else {
        return Err(syn::Error::new(
            ident.span(),
            format!("Cannot derive Table for {ident}; it can only be derived for structs"),
        ));
    };
    let syn::Fields::Named(fields) = struct_data.fields else {
        return Err(syn::Error::new(
            ident.span(),
            format!("Cannot derive Table for {ident}; fields must be named"),
        ));
    };

    let table_attrs = TableAttrs::parse(&attrs)?;
    let table_name = table_attrs
        .name
        .clone()
        .unwrap_or_else(|| ident.unraw().to_string());

    let mut columns: Vec<Column> = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let column = column(field)?;
        if columns.iter().any(|other| other.name == column.name) {
            return Err(syn::Error::new(
                field.span(),
                format!("column `{}` is defined more than once", column.name),
            ));
        }
        columns.push(column);
    }
    check_table_columns(&table_attrs, &columns)?;

    let column_names = columns.iter().map(|column| &column.name).collect::<Vec<_>>();
    let column_builders = columns.iter().map(|column| &column.builder);
    let indexes = impl_indexes(&table_attrs);
    let foreign_keys = impl_foreign_keys(&table_attrs);
    let deprecated = table_attrs.deprecated.then(|| quote! { .deprecated() });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tabledef::schema::Table for #ident #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }

            fn column_names() -> &'static [&'static str] {
                &[#(#column_names),*]
            }

            fn table_config() -> ::tabledef::schema::TableConfig {
                ::tabledef::schema::TableConfig::new()
                    #(.column(#column_names, #column_builders))*
                    #(#indexes)*
                    #(#foreign_keys)*
                    #deprecated
            }
        }
    })
}

/// Builds the column of a field.
fn column(field: &Field) -> syn::Result<Column> {
    let attrs = ColumnAttrs::parse(&field.attrs)?;
    let name = match &attrs.name {
        Some(name) => name.clone(),
        None => field
            .ident
            .as_ref()
            .map(|ident| ident.unraw().to_string())
            .ok_or_else(|| syn::Error::new(field.span(), "fields must be named"))?,
    };

    let (ty, optional_type) = match utils::option_inner(&field.ty) {
        Some(inner) => (inner, true),
        None => (&field.ty, false),
    };
    let kind = attrs
        .kind
        .or_else(|| ColumnKind::from_type(ty))
        .ok_or_else(|| {
            syn::Error::new(
                field.ty.span(),
                "cannot infer the column type; use #[column(kind = \"...\")]",
            )
        })?;
    let optional = attrs.optional || optional_type;

    let error = |message: &str| Err(syn::Error::new(field.span(), message));
    if (attrs.primary_key || attrs.references.is_some()) && !kind.is_key() {
        return error("only number and text columns can be primary keys or references");
    }
    if attrs.primary_key && optional {
        return error("a primary key cannot be optional");
    }
    if attrs.primary_key && (attrs.default.is_some() || attrs.sql_default.is_some()) {
        return error("a primary key cannot have a default");
    }
    if (attrs.multiline || attrs.enum_values.is_some()) && kind != ColumnKind::Text {
        return error("`multiline` and `enum_values` only apply to text columns");
    }

    let mut calls = Vec::new();
    if attrs.primary_key {
        calls.push(quote! { primary_key() });
    }
    if optional {
        calls.push(quote! { optional() });
    }
    if attrs.unique {
        calls.push(quote! { unique() });
    }
    if attrs.deprecated {
        calls.push(quote! { deprecated() });
    }
    if let Some(label) = &attrs.label {
        calls.push(quote! { label(#label) });
    }
    if attrs.multiline {
        calls.push(quote! { multiline() });
    }
    if let Some(values) = &attrs.enum_values {
        calls.push(quote! { enum_values([#(#values),*]) });
    }
    if let Some((table, column)) = &attrs.references {
        calls.push(quote! { references(#table, #column) });
    }
    if let Some(default) = &attrs.default {
        let value = default_value(kind, default)?;
        calls.push(quote! { with_default(#value) });
    }
    if let Some(sql) = &attrs.sql_default {
        if kind == ColumnKind::Json {
            return error("json columns cannot have a `sql_default`");
        }
        calls.push(quote! { with_default(::tabledef::schema::SqlExpr::from_static(#sql)) });
    }

    let builder = kind.builder();
    Ok(Column {
        name,
        builder: quote! { ::tabledef::schema::column::#builder() #(.#calls)* },
    })
}

/// Converts a literal default to the default of a `kind` column.
fn default_value(kind: ColumnKind, default: &DefaultValue) -> syn::Result<TokenStream2> {
    let lit = &default.lit;
    let neg = default.negative.then(|| quote! { - });
    let mismatch = |expected: &str| {
        Err(syn::Error::new(
            lit.span(),
            format!("expected a {expected} default"),
        ))
    };

    match (kind, lit) {
        (ColumnKind::Boolean, _) => match default.as_bool() {
            Some(lit) => Ok(quote! { #lit }),
            None => mismatch("boolean"),
        },
        (ColumnKind::Number, Lit::Int(lit)) => Ok(quote! { #neg (#lit as i64) }),
        (ColumnKind::Number, Lit::Float(lit)) => {
            let (mantissa, scale) = decimal_parts(lit.base10_digits())
                .ok_or_else(|| syn::Error::new(lit.span(), "unsupported number literal"))?;
            let mantissa = if default.negative { -mantissa } else { mantissa };
            Ok(quote! { ::tabledef::schema::Decimal::new(#mantissa, #scale) })
        }
        (ColumnKind::Number, _) => mismatch("number"),
        (ColumnKind::Text, Lit::Str(lit)) => Ok(quote! { #lit }),
        (ColumnKind::Text, _) => mismatch("string"),
        (ColumnKind::Date, _) => Err(syn::Error::new(
            lit.span(),
            "date defaults must be given with `sql_default`",
        )),
        (ColumnKind::Json, Lit::Int(lit)) => Ok(quote! { #neg (#lit as i64) }),
        (ColumnKind::Json, Lit::Float(lit)) => Ok(quote! { #neg (#lit as f64) }),
        (ColumnKind::Json, Lit::Str(_) | Lit::Bool(_)) => Ok(quote! { #lit }),
        (ColumnKind::Json, _) => mismatch("json"),
    }
}

/// Splits a decimal literal, e.g. `"12.50"` into `(1250, 2)`.
fn decimal_parts(digits: &str) -> Option<(i64, u32)> {
    if digits.contains(['e', 'E']) {
        return None;
    }
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let scale = u32::try_from(fraction.len()).ok().filter(|scale| *scale <= 28)?;
    let mantissa = format!("{integer}{fraction}").parse().ok()?;
    Some((mantissa, scale))
}

/// Checks that indexes and foreign keys only name columns of the struct.
fn check_table_columns(table: &TableAttrs, columns: &[Column]) -> syn::Result<()> {
    let check = |name: &String, span| {
        if columns.iter().any(|column| &column.name == name) {
            Ok(())
        } else {
            Err(syn::Error::new(span, format!("unknown column `{name}`")))
        }
    };

    for index in &table.indexes {
        index.on.iter().try_for_each(|name| check(name, index.span))?;
    }
    for foreign_key in &table.foreign_keys {
        foreign_key
            .columns
            .iter()
            .try_for_each(|name| check(name, foreign_key.span))?;
    }

    Ok(())
}

/// Generate the `.index(...)` calls.
fn impl_indexes(table: &TableAttrs) -> Vec<TokenStream2> {
    table
        .indexes
        .iter()
        .map(|index| {
            let on = &index.on;
            let unique = index.unique.then(|| quote! { .unique() });
            let name = index.name.as_ref().map(|name| quote! { .named(#name) });
            quote! {
                .index(::tabledef::schema::IndexInput::on(::std::vec![#(#on),*]) #unique #name)
            }
        })
        .collect()
}

/// Generate the `.foreign_key(...)` calls.
fn impl_foreign_keys(table: &TableAttrs) -> Vec<TokenStream2> {
    table
        .foreign_keys
        .iter()
        .map(|foreign_key| {
            let columns = &foreign_key.columns;
            let references = foreign_key.references.iter().map(|(table, column)| {
                quote! { ::tabledef::schema::ColumnRef::new(#table, #column) }
            });
            quote! {
                .foreign_key(::std::vec![#(#columns),*], ::std::vec![#(#references),*])
            }
        })
        .collect()
}
