//! Query parameters for list and count endpoints.
//!
//! `filter` and `sort` arrive as JSON objects in the query string
//! (`?filter={"category":"shoes"}&sort={"price":-1}`). Only whitelisted
//! fields are accepted; everything else is rejected before any SQL is built.

use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// Hard upper bound on `limit`.
pub const MAX_LIMIT: i64 = 100;

/// Raw list parameters as received.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub skip: Option<i64>,
}

/// Filterable and sortable fields of one resource.
#[derive(Debug, Clone, Copy)]
pub struct ListFields {
    /// Public field name to column name.
    pub columns: &'static [(&'static str, &'static str)],
    /// Fields holding identifiers rather than text.
    pub id_fields: &'static [&'static str],
    pub default_limit: i64,
}

impl ListFields {
    fn column(&self, field: &str) -> ApiResult<&'static str> {
        self.columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| ApiError::InvalidQueryParam(format!("unknown field '{field}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Id(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn parse(field: &str, value: &Value) -> ApiResult<Self> {
        let order = match value {
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(Self::Asc),
                Some(-1) => Some(Self::Desc),
                _ => None,
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "asc" | "ascending" => Some(Self::Asc),
                "-1" | "desc" | "descending" => Some(Self::Desc),
                _ => None,
            },
            _ => None,
        };

        order.ok_or_else(|| {
            ApiError::InvalidQueryParam(format!("sort direction for '{field}' must be 1 or -1"))
        })
    }
}

/// Checked list query, ready to be turned into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Vec<(&'static str, FilterValue)>,
    pub sort: Vec<(&'static str, SortOrder)>,
    pub limit: i64,
    pub skip: i64,
}

impl ListParams {
    /// Full list query: filter, sort, limit and skip.
    pub fn into_query(self, fields: &ListFields) -> ApiResult<ListQuery> {
        let filters = parse_filter(self.filter.as_deref(), fields)?;
        let sort = parse_sort(self.sort.as_deref(), fields)?;

        // `limit=0` means "no explicit limit", so it falls back to the default.
        let limit = match self.limit {
            None | Some(0) => fields.default_limit,
            Some(n) if n < 0 => {
                return Err(ApiError::InvalidQueryParam("limit must not be negative".into()))
            }
            Some(n) => n.min(MAX_LIMIT),
        };
        let skip = match self.skip {
            None => 0,
            Some(n) if n < 0 => {
                return Err(ApiError::InvalidQueryParam("skip must not be negative".into()))
            }
            Some(n) => n,
        };

        Ok(ListQuery {
            filters,
            sort,
            limit,
            skip,
        })
    }

    /// Filter only, for count endpoints.
    pub fn into_filters(self, fields: &ListFields) -> ApiResult<Vec<(&'static str, FilterValue)>> {
        parse_filter(self.filter.as_deref(), fields)
    }
}

fn parse_object(raw: Option<&str>, param: &str) -> ApiResult<serde_json::Map<String, Value>> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(serde_json::Map::new());
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::InvalidQueryParam(format!("{param} must be a JSON object"))),
        Err(err) => Err(ApiError::InvalidQueryParam(format!("{param}: {err}"))),
    }
}

fn parse_filter(
    raw: Option<&str>,
    fields: &ListFields,
) -> ApiResult<Vec<(&'static str, FilterValue)>> {
    parse_object(raw, "filter")?
        .into_iter()
        .map(|(field, value)| -> ApiResult<_> {
            let column = fields.column(&field)?;
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(ApiError::InvalidQueryParam(format!(
                        "filter value for '{field}' must be a scalar"
                    )))
                }
            };

            let value = if fields.id_fields.contains(&field.as_str()) {
                let id = Uuid::parse_str(&text).map_err(|_| {
                    ApiError::InvalidQueryParam(format!("filter value for '{field}' is not an id"))
                })?;
                FilterValue::Id(id)
            } else {
                FilterValue::Text(text)
            };

            Ok((column, value))
        })
        .collect()
}

fn parse_sort(raw: Option<&str>, fields: &ListFields) -> ApiResult<Vec<(&'static str, SortOrder)>> {
    parse_object(raw, "sort")?
        .into_iter()
        .map(|(field, value)| -> ApiResult<_> {
            Ok((fields.column(&field)?, SortOrder::parse(&field, &value)?))
        })
        .collect()
}
