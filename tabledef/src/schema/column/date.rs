use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::base::{BaseColumn, BaseColumnOpts, impl_base_opts};
use crate::schema::SqlExpr;

/// Default value of a date column, as authored in a config.
///
/// Dates are read from ISO-8601 strings or from TOML datetimes. A TOML local datetime or local
/// date is taken as UTC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateDefaultInput {
    Value(DateTime<Utc>),
    Sql(SqlExpr),
}

impl<'de> Deserialize<'de> for DateDefaultInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Iso(String),
            Toml(toml::value::Datetime),
            Sql(SqlExpr),
        }

        let repr = Repr::deserialize(deserializer).map_err(|_| {
            D::Error::custom("expected an ISO-8601 date, a TOML datetime or a `{ sql }` expression")
        })?;
        match repr {
            Repr::Iso(date) => date
                .parse::<DateTime<Utc>>()
                .map(DateDefaultInput::Value)
                .map_err(|err| D::Error::custom(format!("invalid date `{date}`: {err}"))),
            Repr::Toml(date) => parse_toml_datetime(&date)
                .map(DateDefaultInput::Value)
                .ok_or_else(|| D::Error::custom(format!("invalid date `{date}`"))),
            Repr::Sql(sql) => Ok(DateDefaultInput::Sql(sql)),
        }
    }
}

/// Converts a TOML datetime; a datetime without offset or a date alone is read as UTC.
fn parse_toml_datetime(date: &toml::value::Datetime) -> Option<DateTime<Utc>> {
    let s = date.to_string();
    match (date.date.is_some(), date.time.is_some(), date.offset.is_some()) {
        (true, true, true) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        (true, true, false) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|date| date.and_utc()),
        (true, false, _) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| date.and_utc()),
        (false, _, _) => None,
    }
}

impl From<DateTime<Utc>> for DateDefaultInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateDefaultInput::Value(value)
    }
}

impl From<SqlExpr> for DateDefaultInput {
    fn from(sql: SqlExpr) -> Self {
        DateDefaultInput::Sql(sql)
    }
}

/// Default value of a resolved date column.
///
/// Literal dates are stored as ISO-8601 strings with millisecond precision, e.g.
/// `2024-03-12T10:00:00.000Z`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateDefault {
    Value(String),
    Sql(SqlExpr),
}

impl From<DateDefaultInput> for DateDefault {
    fn from(default: DateDefaultInput) -> Self {
        match default {
            DateDefaultInput::Value(date) => {
                DateDefault::Value(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            DateDefaultInput::Sql(sql) => DateDefault::Sql(sql),
        }
    }
}

/// A date column, as authored in a config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumnInput {
    #[serde(flatten)]
    pub base: BaseColumnOpts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DateDefaultInput>,
}

impl_base_opts!(DateColumnInput);

impl DateColumnInput {
    /// Sets the default value of the column.
    pub fn with_default(mut self, default: impl Into<DateDefaultInput>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub(crate) fn resolve(self, table: &str, name: &str) -> DateColumn {
        DateColumn {
            base: self.base.resolve(table, name),
            default: self.default.map(DateDefault::from),
        }
    }
}

/// A resolved date column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumn {
    #[serde(flatten)]
    pub base: BaseColumn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DateDefault>,
}
