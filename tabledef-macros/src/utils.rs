use proc_macro2::Span;
use syn::{GenericArgument, Ident, PathArguments, Type};

/// Column types a field can be mapped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    Number,
    Text,
    Date,
    Json,
}

impl ColumnKind {
    /// Parses the value of a `kind = "..."` attribute.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "text" => Some(Self::Text),
            "date" => Some(Self::Date),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infers the column type from the Rust type of a field, by the last segment of its path.
    pub fn from_type(ty: &Type) -> Option<Self> {
        match ty {
            Type::Reference(reference) => Self::from_type(&reference.elem),
            Type::Group(group) => Self::from_type(&group.elem),
            Type::Path(path) => {
                let segment = path.path.segments.last()?;
                match segment.ident.to_string().as_str() {
                    "bool" => Some(Self::Boolean),
                    "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
                    | "u64" | "u128" | "usize" | "f32" | "f64" | "Decimal" => Some(Self::Number),
                    "String" | "str" => Some(Self::Text),
                    "DateTime" | "NaiveDateTime" | "NaiveDate" | "SystemTime" => Some(Self::Date),
                    "Value" => Some(Self::Json),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Name of the `tabledef::schema::column` function building this column.
    pub fn builder(self) -> Ident {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Text => "text",
            Self::Date => "date",
            Self::Json => "json",
        };
        Ident::new(name, Span::call_site())
    }

    /// Whether the column can be a primary key or reference another column.
    pub fn is_key(self) -> bool {
        matches!(self, Self::Number | Self::Text)
    }
}

/// Returns `T` if `ty` is `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Splits a comma separated list, e.g. `"name, email"`.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a `table.column` reference.
pub fn split_reference(value: &str) -> Option<(String, String)> {
    let (table, column) = value.trim().split_once('.')?;
    if table.is_empty() || column.is_empty() || column.contains('.') {
        return None;
    }
    Some((table.to_string(), column.to_string()))
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_infer_column_kind() {
        let cases: [(Type, Option<ColumnKind>); 7] = [
            (syn::parse_quote!(bool), Some(ColumnKind::Boolean)),
            (syn::parse_quote!(u64), Some(ColumnKind::Number)),
            (syn::parse_quote!(rust_decimal::Decimal), Some(ColumnKind::Number)),
            (syn::parse_quote!(&'static str), Some(ColumnKind::Text)),
            (syn::parse_quote!(chrono::DateTime<chrono::Utc>), Some(ColumnKind::Date)),
            (syn::parse_quote!(serde_json::Value), Some(ColumnKind::Json)),
            (syn::parse_quote!(Vec<u8>), None),
        ];
        for (ty, expected) in cases {
            assert_eq!(ColumnKind::from_type(&ty), expected);
        }
    }

    #[test]
    fn test_should_get_option_inner_type() {
        let ty: Type = syn::parse_quote!(Option<String>);
        let inner = option_inner(&ty).expect("not an option");
        assert_eq!(ColumnKind::from_type(inner), Some(ColumnKind::Text));

        let ty: Type = syn::parse_quote!(String);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_should_split_lists_and_references() {
        assert_eq!(split_list(" name, email ,"), vec!["name", "email"]);
        assert_eq!(
            split_reference("Author.id"),
            Some(("Author".to_string(), "id".to_string()))
        );
        assert_eq!(split_reference("Author"), None);
        assert_eq!(split_reference("a.b.c"), None);
    }
}
