//! Generic list-query translation.
//!
//! A raw query-string map is parsed once into a [`ListQuery`]: a list of
//! [`Filter`]s plus sort keys, an optional column projection and paging. The
//! SQL renderer in [`sql`] interprets the same filters for both the data query
//! and the count query, so `total` always matches what the page was cut from.

pub mod sql;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::utils::dates::parse_day;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Search keys in priority order; the first one present wins.
const SEARCH_KEYS: &[&str] = &["search", "searchTerm", "q"];
const RESERVED_KEYS: &[&str] = &[
    "search",
    "searchTerm",
    "q",
    "searchFields",
    "sort",
    "limit",
    "page",
    "fields",
];

/// Value of a query-string key. Repeated keys collapse into `Many`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    pub fn first(&self) -> &str {
        match self {
            QueryValue::One(v) => v,
            QueryValue::Many(vs) => vs.first().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn last(&self) -> &str {
        match self {
            QueryValue::One(v) => v,
            QueryValue::Many(vs) => vs.last().map(String::as_str).unwrap_or(""),
        }
    }
}

/// Query-string pairs keyed in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, String)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut entries: Vec<(String, QueryValue)> = Vec::new();

        for (key, value) in pairs {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => {
                    let merged = match std::mem::replace(slot, QueryValue::Many(Vec::new())) {
                        QueryValue::One(prev) => vec![prev, value],
                        QueryValue::Many(mut prev) => {
                            prev.push(value);
                            prev
                        }
                    };
                    *slot = QueryValue::Many(merged);
                }
                None => entries.push((key, QueryValue::One(value))),
            }
        }

        QueryMap { entries }
    }
}

/// Comparison operators accepted inside `field[op]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Ne => "!=",
        }
    }

    /// Only ordering comparisons coerce their operand; `ne` compares raw text.
    fn coerces(self) -> bool {
        !matches!(self, CompareOp::Ne)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
}

impl FilterValue {
    /// Number if numeric, else a `YYYY-MM-DD` day if date-like, else raw text.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            if !trimmed.is_empty() && n.is_finite() {
                return FilterValue::Number(n);
            }
        }
        match parse_day(raw) {
            Some(day) => FilterValue::Text(day.format("%Y-%m-%d").to_string()),
            None => FilterValue::Text(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { field: String, value: String },
    Compare { field: String, op: CompareOp, value: FilterValue },
    In { field: String, values: Vec<String> },
    Search { fields: Vec<String>, term: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub sort: Vec<SortKey>,
    /// `None` selects every column.
    pub fields: Option<Vec<String>>,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(rename = "totalPage")]
    pub total_page: u64,
}

impl PageMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_page: total.div_ceil(limit.max(1)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Splits `field[op]` into its parts; `None` when the key has no bracket suffix.
fn split_operator(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let (field, op) = inner.split_once('[')?;
    if field.is_empty() || op.is_empty() {
        return None;
    }
    Some((field, op))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn positive_or(raw: Option<&QueryValue>, default: u64) -> u64 {
    raw.and_then(|v| v.first().trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn parse_filter(key: &str, value: &QueryValue) -> Filter {
    let Some((field, op)) = split_operator(key) else {
        return match value {
            QueryValue::One(v) => Filter::Equals {
                field: key.to_string(),
                value: v.clone(),
            },
            QueryValue::Many(vs) => Filter::In {
                field: key.to_string(),
                values: vs.clone(),
            },
        };
    };

    if op == "in" {
        let values = match value {
            QueryValue::One(v) => v.split(',').map(str::to_string).collect(),
            QueryValue::Many(vs) => vs.clone(),
        };
        return Filter::In {
            field: field.to_string(),
            values,
        };
    }

    match op.parse::<CompareOp>() {
        Ok(op) => {
            let raw = value.last();
            let value = if op.coerces() {
                FilterValue::coerce(raw)
            } else {
                FilterValue::Text(raw.to_string())
            };
            Filter::Compare {
                field: field.to_string(),
                op,
                value,
            }
        }
        // Unrecognised operators degrade to equality on the bare field name.
        Err(_) => Filter::Equals {
            field: field.to_string(),
            value: value.last().to_string(),
        },
    }
}

impl ListQuery {
    /// Parses a query map. `search_fields` is the caller's allow-list of
    /// columns the search term is matched against.
    pub fn parse(params: &QueryMap, search_fields: &[&str]) -> Self {
        let mut filters = Vec::new();

        let term = SEARCH_KEYS
            .iter()
            .find_map(|k| params.get(k))
            .map(|v| v.first().to_string())
            .filter(|t| !t.is_empty());
        if let Some(term) = term {
            if !search_fields.is_empty() {
                filters.push(Filter::Search {
                    fields: search_fields.iter().map(|f| f.to_string()).collect(),
                    term,
                });
            }
        }

        for (key, value) in params.iter() {
            if RESERVED_KEYS.contains(&key) {
                continue;
            }
            filters.push(parse_filter(key, value));
        }

        let mut sort: Vec<SortKey> = params
            .get("sort")
            .map(|v| split_list(v.first()))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match part.strip_prefix('-') {
                Some("") => None,
                Some(field) => Some(SortKey {
                    field: field.to_string(),
                    direction: SortDirection::Desc,
                }),
                None => Some(SortKey {
                    field: part,
                    direction: SortDirection::Asc,
                }),
            })
            .collect();
        if sort.is_empty() {
            sort.push(SortKey {
                field: DEFAULT_SORT_FIELD.to_string(),
                direction: SortDirection::Desc,
            });
        }

        let fields = params
            .get("fields")
            .map(|v| split_list(v.first()))
            .filter(|cols| !cols.is_empty());

        ListQuery {
            filters,
            sort,
            fields,
            page: positive_or(params.get("page"), DEFAULT_PAGE),
            limit: positive_or(params.get("limit"), DEFAULT_LIMIT),
        }
    }

    /// Rows to skip; saturates for pages past the addressable range.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta::new(self.page, self.limit, total)
    }
}
