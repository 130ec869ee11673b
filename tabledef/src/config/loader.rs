use std::path::Path;

use tracing::debug;

use super::{ConfigError, ConfigResult, DbConfigInput};

impl DbConfigInput {
    /// Parses a config from a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        toml::from_str(s).map_err(ConfigError::from)
    }

    /// Parses a config from a JSON document.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        serde_json::from_str(s).map_err(ConfigError::from)
    }

    /// Loads a config file; the format is chosen by the file extension.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    path.display().to_string(),
                ));
            }
        };

        debug!(path = %path.display(), "loading db config");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        parse(&content)
    }
}

#[cfg(test)]
mod tests {

    use std::io::Write as _;

    use super::*;
    use crate::schema::{ColumnType, DateDefault, IndexesInput, NumberDefault, SchemaError};

    const AUTHOR_TOML: &str = r#"
[tables.Author]
indexes = [{ on = ["name", "email"], unique = true }]

[tables.Author.columns.id]
type = "number"
primary_key = true

[tables.Author.columns.name]
type = "text"
label = "Full name"

[tables.Author.columns.email]
type = "text"
unique = true

[tables.Author.columns.karma]
type = "number"
default = 10

[tables.Comment.columns.author_id]
type = "number"
references = "Author.id"

[tables.Comment.columns.body]
type = "text"
multiline = true

[[tables.Comment.foreign_keys]]
columns = "author_id"
references = { table = "Author", column = "id" }
"#;

    #[test]
    fn test_should_parse_toml_config() {
        let config = DbConfigInput::from_toml_str(AUTHOR_TOML).expect("failed to parse");
        let tables = config.tables.as_ref().expect("no tables");
        assert_eq!(tables.len(), 2);
        assert!(matches!(
            tables["Author"].indexes,
            Some(IndexesInput::List(ref list)) if list.len() == 1
        ));

        let config = config.resolve().expect("failed to resolve");
        let author = config.table("Author").expect("missing Author");
        assert_eq!(
            author.columns["name"].base().label.as_deref(),
            Some("Full name")
        );
        assert_eq!(
            author.columns["karma"]
                .as_number()
                .and_then(|column| column.default.clone()),
            Some(NumberDefault::Value(10.into()))
        );
        assert!(author.indexes.contains_key("Author_email_name_idx"));

        let comment = config.table("Comment").expect("missing Comment");
        assert_eq!(comment.columns["body"].column_type(), ColumnType::Text);
        assert_eq!(comment.foreign_keys.len(), 1);
    }

    #[test]
    fn test_should_keep_column_order_of_config_files() {
        let config = DbConfigInput::from_toml_str(AUTHOR_TOML)
            .expect("failed to parse")
            .resolve()
            .expect("failed to resolve");
        let author = config.table("Author").expect("missing Author");
        assert_eq!(
            author.columns.keys().collect::<Vec<_>>(),
            vec!["id", "name", "email", "karma"]
        );

        let config = DbConfigInput::from_json_str(
            r#"{ "tables": { "Tag": { "columns": {
                "slug": { "type": "text", "primary_key": true },
                "label": { "type": "text" },
                "color": { "type": "text", "optional": true }
            } } } }"#,
        )
        .expect("failed to parse")
        .resolve()
        .expect("failed to resolve");
        assert_eq!(
            config.tables["Tag"].columns.keys().collect::<Vec<_>>(),
            vec!["slug", "label", "color"]
        );
    }

    #[test]
    fn test_should_parse_toml_datetime_default() {
        let config = DbConfigInput::from_toml_str(
            r#"
[tables.Event.columns.starts_at]
type = "date"
default = 2024-01-01T00:00:00Z
"#,
        )
        .expect("failed to parse")
        .resolve()
        .expect("failed to resolve");

        assert_eq!(
            config.tables["Event"].columns["starts_at"]
                .as_date()
                .and_then(|column| column.default.clone()),
            Some(DateDefault::Value("2024-01-01T00:00:00.000Z".to_string()))
        );
    }

    #[test]
    fn test_should_parse_json_config() {
        let config = DbConfigInput::from_json_str(
            r#"{ "tables": { "Tag": { "columns": { "slug": { "type": "text", "primary_key": true } } } } }"#,
        )
        .expect("failed to parse");
        let config = config.resolve().expect("failed to resolve");
        assert!(config.tables["Tag"].columns["slug"].is_primary_key());
    }

    #[test]
    fn test_should_reject_unknown_column_type_in_toml() {
        let result = DbConfigInput::from_toml_str(
            r#"
[tables.Tag.columns.slug]
type = "varchar"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_should_reject_misspelled_column_option_in_toml() {
        let config = DbConfigInput::from_toml_str(
            r#"
[tables.Tag.columns.slug]
type = "text"
primaryKey = true
"#,
        )
        .expect("failed to parse");
        assert!(matches!(
            config.resolve(),
            Err(SchemaError::UnknownColumnOption { option, .. }) if option == "primaryKey"
        ));
    }

    #[test]
    fn test_should_load_config_file_by_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("failed to create temp file");
        file.write_all(AUTHOR_TOML.as_bytes())
            .expect("failed to write config");

        let config = DbConfigInput::load(file.path()).expect("failed to load");
        assert_eq!(config.tables.map(|tables| tables.len()), Some(2));
    }

    #[test]
    fn test_should_not_load_unsupported_format() {
        let result = DbConfigInput::load("db.config.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(path)) if path == "db.config.yaml"));
    }

    #[test]
    fn test_should_report_missing_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let result = DbConfigInput::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
