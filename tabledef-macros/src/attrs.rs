use proc_macro2::Span;
use syn::spanned::Spanned as _;
use syn::{Attribute, Expr, ExprLit, ExprUnary, Lit, LitBool, LitStr, UnOp};

use crate::utils::{self, ColumnKind};

/// Options given with `#[table(...)]`.
#[derive(Default)]
pub struct TableAttrs {
    pub name: Option<String>,
    pub deprecated: bool,
    pub indexes: Vec<IndexAttr>,
    pub foreign_keys: Vec<ForeignKeyAttr>,
}

/// `index(on = "...", unique, name = "...")`
pub struct IndexAttr {
    pub on: Vec<String>,
    pub unique: bool,
    pub name: Option<String>,
    pub span: Span,
}

/// `foreign_key(columns = "...", references = "Table.column, ...")`
pub struct ForeignKeyAttr {
    pub columns: Vec<String>,
    pub references: Vec<(String, String)>,
    pub span: Span,
}

/// Options given with `#[column(...)]`.
#[derive(Default)]
pub struct ColumnAttrs {
    pub name: Option<String>,
    pub kind: Option<ColumnKind>,
    pub primary_key: bool,
    pub unique: bool,
    pub optional: bool,
    pub deprecated: bool,
    pub multiline: bool,
    pub label: Option<LitStr>,
    pub enum_values: Option<Vec<String>>,
    pub default: Option<DefaultValue>,
    pub sql_default: Option<LitStr>,
    pub references: Option<(String, String)>,
}

/// A literal default value, possibly negated.
pub struct DefaultValue {
    pub negative: bool,
    pub lit: Lit,
}

impl TableAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut table = TableAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("table")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    table.name = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("deprecated") {
                    table.deprecated = true;
                } else if meta.path.is_ident("index") {
                    let mut index = IndexAttr {
                        on: Vec::new(),
                        unique: false,
                        name: None,
                        span: meta.path.span(),
                    };
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("on") {
                            index.on = utils::split_list(&inner.value()?.parse::<LitStr>()?.value());
                        } else if inner.path.is_ident("unique") {
                            index.unique = true;
                        } else if inner.path.is_ident("name") {
                            index.name = Some(inner.value()?.parse::<LitStr>()?.value());
                        } else {
                            return Err(inner.error("unknown index option"));
                        }
                        Ok(())
                    })?;
                    if index.on.is_empty() {
                        return Err(meta.error("index requires at least one column in `on`"));
                    }
                    table.indexes.push(index);
                } else if meta.path.is_ident("foreign_key") {
                    let mut foreign_key = ForeignKeyAttr {
                        columns: Vec::new(),
                        references: Vec::new(),
                        span: meta.path.span(),
                    };
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("columns") {
                            foreign_key.columns =
                                utils::split_list(&inner.value()?.parse::<LitStr>()?.value());
                        } else if inner.path.is_ident("references") {
                            let lit = inner.value()?.parse::<LitStr>()?;
                            foreign_key.references = utils::split_list(&lit.value())
                                .iter()
                                .map(|reference| {
                                    utils::split_reference(reference).ok_or_else(|| {
                                        syn::Error::new(
                                            lit.span(),
                                            format!("expected `table.column`, found `{reference}`"),
                                        )
                                    })
                                })
                                .collect::<syn::Result<_>>()?;
                        } else {
                            return Err(inner.error("unknown foreign key option"));
                        }
                        Ok(())
                    })?;
                    if foreign_key.columns.is_empty() {
                        return Err(meta.error("foreign key requires `columns`"));
                    }
                    if foreign_key.columns.len() != foreign_key.references.len() {
                        return Err(meta.error(
                            "foreign key must have as many `references` as `columns`",
                        ));
                    }
                    table.foreign_keys.push(foreign_key);
                } else {
                    return Err(meta.error("unknown table option"));
                }
                Ok(())
            })?;
        }

        Ok(table)
    }
}

impl ColumnAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut column = ColumnAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("column")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    column.name = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("kind") {
                    let lit = meta.value()?.parse::<LitStr>()?;
                    column.kind = Some(ColumnKind::from_name(&lit.value()).ok_or_else(|| {
                        syn::Error::new(
                            lit.span(),
                            "expected one of `boolean`, `number`, `text`, `date`, `json`",
                        )
                    })?);
                } else if meta.path.is_ident("primary_key") {
                    column.primary_key = true;
                } else if meta.path.is_ident("unique") {
                    column.unique = true;
                } else if meta.path.is_ident("optional") {
                    column.optional = true;
                } else if meta.path.is_ident("deprecated") {
                    column.deprecated = true;
                } else if meta.path.is_ident("multiline") {
                    column.multiline = true;
                } else if meta.path.is_ident("label") {
                    column.label = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("enum_values") {
                    let values = utils::split_list(&meta.value()?.parse::<LitStr>()?.value());
                    if values.is_empty() {
                        return Err(meta.error("`enum_values` cannot be empty"));
                    }
                    column.enum_values = Some(values);
                } else if meta.path.is_ident("default") {
                    column.default = Some(DefaultValue::parse(meta.value()?.parse()?)?);
                } else if meta.path.is_ident("sql_default") {
                    column.sql_default = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("references") {
                    let lit = meta.value()?.parse::<LitStr>()?;
                    column.references = Some(utils::split_reference(&lit.value()).ok_or_else(
                        || syn::Error::new(lit.span(), "expected `table.column`"),
                    )?);
                } else {
                    return Err(meta.error("unknown column option"));
                }
                Ok(())
            })?;
        }

        if column.default.is_some() && column.sql_default.is_some() {
            return Err(syn::Error::new(
                Span::call_site(),
                "`default` and `sql_default` are mutually exclusive",
            ));
        }

        Ok(column)
    }
}

impl DefaultValue {
    fn parse(expr: Expr) -> syn::Result<Self> {
        match expr {
            Expr::Lit(ExprLit { lit, .. }) => Ok(Self {
                negative: false,
                lit,
            }),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr,
                ..
            }) => match *expr {
                Expr::Lit(ExprLit {
                    lit: lit @ (Lit::Int(_) | Lit::Float(_)),
                    ..
                }) => Ok(Self {
                    negative: true,
                    lit,
                }),
                other => Err(syn::Error::new(other.span(), "expected a number literal")),
            },
            other => Err(syn::Error::new(other.span(), "expected a literal")),
        }
    }

    /// Returns the literal if it is a boolean.
    pub fn as_bool(&self) -> Option<&LitBool> {
        match &self.lit {
            Lit::Bool(lit) if !self.negative => Some(lit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {

    use syn::parse_quote;

    use super::*;

    #[test]
    fn test_should_parse_table_attrs() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[table(name = "Post", deprecated)]),
            parse_quote!(#[table(index(on = "title, author_id", unique, name = "by_title"))]),
            parse_quote!(#[table(foreign_key(columns = "author_id", references = "Author.id"))]),
        ];
        let table = TableAttrs::parse(&attrs).expect("failed to parse");

        assert_eq!(table.name.as_deref(), Some("Post"));
        assert!(table.deprecated);
        assert_eq!(table.indexes[0].on, vec!["title", "author_id"]);
        assert!(table.indexes[0].unique);
        assert_eq!(table.indexes[0].name.as_deref(), Some("by_title"));
        assert_eq!(table.foreign_keys[0].columns, vec!["author_id"]);
        assert_eq!(
            table.foreign_keys[0].references,
            vec![("Author".to_string(), "id".to_string())]
        );
    }

    #[test]
    fn test_should_reject_foreign_key_with_different_arity() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[table(foreign_key(columns = "a, b", references = "Author.id"))]
        )];
        assert!(TableAttrs::parse(&attrs).is_err());
    }

    #[test]
    fn test_should_parse_column_attrs() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[column(name = "status", unique, enum_values = "draft, published", default = "draft")]
        )];
        let column = ColumnAttrs::parse(&attrs).expect("failed to parse");

        assert_eq!(column.name.as_deref(), Some("status"));
        assert!(column.unique);
        assert_eq!(
            column.enum_values,
            Some(vec!["draft".to_string(), "published".to_string()])
        );
        assert!(matches!(
            column.default,
            Some(DefaultValue { negative: false, lit: Lit::Str(_) })
        ));
    }

    #[test]
    fn test_should_parse_negative_default() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[column(default = -1)])];
        let column = ColumnAttrs::parse(&attrs).expect("failed to parse");
        assert!(matches!(
            column.default,
            Some(DefaultValue { negative: true, lit: Lit::Int(_) })
        ));
    }

    #[test]
    fn test_should_reject_unknown_options() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[column(autoincrement)])];
        assert!(ColumnAttrs::parse(&attrs).is_err());

        let attrs: Vec<Attribute> = vec![parse_quote!(#[column(kind = "blob")])];
        assert!(ColumnAttrs::parse(&attrs).is_err());

        let attrs: Vec<Attribute> =
            vec![parse_quote!(#[column(default = 1, sql_default = "RANDOM()")])];
        assert!(ColumnAttrs::parse(&attrs).is_err());
    }
}
