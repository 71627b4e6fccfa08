use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{Arguments, Column, MySqlPool, Row, TypeInfo};

use crate::error::AppError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    F64(f64),
    Date(NaiveDate),
    Decimal(Decimal),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Backtick-quotes an identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
pub fn build_update_sql(
    table: &str,
    assignments: Vec<(&str, SqlValue)>,
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, AppError> {
    if assignments.is_empty() {
        return Err(AppError::invalid("No fields provided for update"));
    }

    let mut set_clause = assignments
        .iter()
        .map(|(column, _)| format!("{} = ?", quote_ident(column)))
        .collect::<Vec<_>>();
    set_clause.push("`updated_at` = CURRENT_TIMESTAMP".to_string());

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quote_ident(table),
        set_clause.join(", "),
        quote_ident(id_column)
    );

    let mut values: Vec<SqlValue> = assignments.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// Collects bind values into positional MySQL arguments.
pub fn to_arguments(values: Vec<SqlValue>) -> MySqlArguments {
    let mut args = MySqlArguments::default();

    for value in values {
        match value {
            SqlValue::String(v) => args.add(v),
            SqlValue::U64(v) => args.add(v),
            SqlValue::F64(v) => args.add(v),
            SqlValue::Date(v) => args.add(v),
            SqlValue::Decimal(v) => args.add(v),
        }
    }

    args
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query_with(&update.sql, to_arguments(update.values))
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Decodes a row with an arbitrary column list into a JSON object.
pub fn row_to_json(row: &MySqlRow) -> Result<Map<String, Value>, sqlx::Error> {
    let mut object = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        let idx = column.ordinal();
        let type_name = column.type_info().name();

        let value = match type_name {
            "BOOLEAN" => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
            t if t.ends_with("UNSIGNED") => row.try_get::<Option<u64>, _>(idx)?.map(Value::from),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                row.try_get::<Option<i64>, _>(idx)?.map(Value::from)
            }
            "FLOAT" | "DOUBLE" => row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
            "DECIMAL" => row
                .try_get::<Option<Decimal>, _>(idx)?
                .and_then(|d| d.to_f64())
                .map(Value::from),
            "DATE" => row
                .try_get::<Option<NaiveDate>, _>(idx)?
                .map(|d| Value::from(d.to_string())),
            "DATETIME" => row
                .try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(|dt| Value::from(dt.and_utc().to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<DateTime<Utc>>, _>(idx)?
                .map(|dt| Value::from(dt.to_rfc3339())),
            _ => row.try_get::<Option<String>, _>(idx)?.map(Value::from),
        };

        object.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }

    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sql_sets_columns_and_touches_updated_at() {
        let update = build_update_sql(
            "employees",
            vec![
                ("name", SqlValue::String("Rahim".into())),
                ("age", SqlValue::U64(31)),
            ],
            "id",
            7,
        )
        .unwrap();

        assert_eq!(
            update.sql,
            "UPDATE `employees` SET `name` = ?, `age` = ?, `updated_at` = CURRENT_TIMESTAMP WHERE `id` = ?"
        );
        assert_eq!(update.values.len(), 3);
        assert_eq!(update.values[2], SqlValue::U64(7));
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = build_update_sql("employees", Vec::new(), "id", 1).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("name"), "`name`");
        assert_eq!(quote_ident("na`me"), "`na``me`");
    }
}
