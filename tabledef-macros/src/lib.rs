#![crate_name = "tabledef_macros"]
#![crate_type = "lib"]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Macros and derive for tabledef
//!
//! This crate provides procedural macros to automatically implement traits
//! required by `tabledef`.
//!
//! ## Provided Derive Macros
//!
//! - `Table`: Automatically implements the `Table` trait for structs.
//!

#![doc(html_playground_url = "https://play.rust-lang.org")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod table;
mod utils;

/// Automatically implements the `Table` trait for a struct.
///
/// Every named field becomes a column, and the struct becomes a table. This derive macro
/// generates three methods required by the `Table` trait:
///
/// - `fn table_name() -> &'static str`
///   The name of the table; the struct name unless `#[table(name = "...")]` is given.
/// - `fn column_names() -> &'static [&'static str]`
///   The names of the columns, in field order.
/// - `fn table_config() -> TableConfig`
///   The table config, built with the column builders of `tabledef::schema::column`.
///
/// # Column types
///
/// The type of a column is inferred from the type of the field:
///
/// | Field type                                              | Column    |
/// |---------------------------------------------------------|-----------|
/// | `bool`                                                  | `boolean` |
/// | integers, `f32`, `f64`, `Decimal`                       | `number`  |
/// | `String`, `&str`                                        | `text`    |
/// | `DateTime`, `NaiveDateTime`, `NaiveDate`, `SystemTime`  | `date`    |
/// | `serde_json::Value`                                     | `json`    |
///
/// `Option<T>` fields are optional columns of the type of `T`. Any other type requires
/// `#[column(kind = "...")]`.
///
/// # Attributes
///
/// On the struct, `#[table(...)]` accepts:
///
/// - `name = "..."`: name of the table;
/// - `deprecated`;
/// - `index(on = "a, b", unique, name = "...")`, repeatable;
/// - `foreign_key(columns = "a, b", references = "Table.a, Table.b")`, repeatable.
///
/// On fields, `#[column(...)]` accepts `name`, `kind`, `primary_key`, `unique`, `optional`,
/// `deprecated`, `label = "..."`, `multiline`, `enum_values = "a, b"`, `default = <literal>`,
/// `sql_default = "<sql>"` and `references = "Table.column"`.
///
/// # What the macro generates
///
/// Given a struct like:
///
/// ```rust,ignore
/// #[derive(Table)]
/// #[table(index(on = "author_id"))]
/// struct Post {
///     #[column(primary_key)]
///     id: u32,
///     title: String,
///     #[column(references = "Author.id")]
///     author_id: u32,
///     #[column(sql_default = "CURRENT_TIMESTAMP")]
///     published: DateTime<Utc>,
/// }
/// ```
///
/// The macro expands into:
///
/// ```rust,ignore
/// impl ::tabledef::schema::Table for Post {
///     fn table_name() -> &'static str {
///         "Post"
///     }
///
///     fn column_names() -> &'static [&'static str] {
///         &["id", "title", "author_id", "published"]
///     }
///
///     fn table_config() -> ::tabledef::schema::TableConfig {
///         ::tabledef::schema::TableConfig::new()
///             .column("id", ::tabledef::schema::column::number().primary_key())
///             .column("title", ::tabledef::schema::column::text())
///             .column("author_id", ::tabledef::schema::column::number().references("Author", "id"))
///             .column(
///                 "published",
///                 ::tabledef::schema::column::date()
///                     .with_default(::tabledef::schema::SqlExpr::from_static("CURRENT_TIMESTAMP")),
///             )
///             .index(::tabledef::schema::IndexInput::on(vec!["author_id"]))
///     }
/// }
/// ```
///
/// # Errors
///
/// The macro will fail to expand if:
///
/// - The macro is applied to a non-struct item, or to a tuple struct
/// - The column type of a field cannot be inferred
/// - Two fields have the same column name
/// - An index or foreign key names a column the struct doesn't have
/// - A primary key is optional or has a default
/// - A default literal doesn't match the column type
///
/// References to other tables are checked when the config is resolved.
#[proc_macro_derive(Table, attributes(table, column))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    self::table::table(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
