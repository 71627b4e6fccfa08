use super::{Filter, FilterValue, ListQuery, SortDirection};
use crate::utils::db_utils::{SqlValue, quote_ident};

/// SQL text plus its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

fn bind_filter_value(value: &FilterValue) -> SqlValue {
    match value {
        FilterValue::Number(n) => SqlValue::F64(*n),
        FilterValue::Text(t) => SqlValue::String(t.clone()),
    }
}

fn render_filter(filter: &Filter, values: &mut Vec<SqlValue>) -> String {
    match filter {
        Filter::Equals { field, value } => {
            values.push(SqlValue::String(value.clone()));
            format!("{} = ?", quote_ident(field))
        }
        Filter::Compare { field, op, value } => {
            values.push(bind_filter_value(value));
            format!("{} {} ?", quote_ident(field), op.symbol())
        }
        // An empty IN list can never match.
        Filter::In { values: set, .. } if set.is_empty() => "1 = 0".to_string(),
        Filter::In { field, values: set } => {
            values.extend(set.iter().cloned().map(SqlValue::String));
            let placeholders = vec!["?"; set.len()].join(", ");
            format!("{} IN ({})", quote_ident(field), placeholders)
        }
        Filter::Search { fields, term } => {
            let pattern = format!("%{}%", term.to_lowercase());
            let ors = fields
                .iter()
                .map(|f| {
                    values.push(SqlValue::String(pattern.clone()));
                    format!("LOWER({}) LIKE ?", quote_ident(f))
                })
                .collect::<Vec<_>>();
            format!("({})", ors.join(" OR "))
        }
    }
}

impl ListQuery {
    /// `WHERE …` shared by the data and count queries; empty when unfiltered.
    pub fn where_clause(&self) -> (String, Vec<SqlValue>) {
        let mut values = Vec::new();
        let conditions = self
            .filters
            .iter()
            .map(|f| render_filter(f, &mut values))
            .collect::<Vec<_>>();

        if conditions.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), values)
        }
    }

    pub fn to_count_sql(&self, table: &str) -> CompiledQuery {
        let (where_clause, values) = self.where_clause();
        CompiledQuery {
            sql: format!("SELECT COUNT(*) FROM {}{}", quote_ident(table), where_clause),
            values,
        }
    }

    pub fn to_select_sql(&self, table: &str) -> CompiledQuery {
        let columns = match &self.fields {
            Some(cols) => cols.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", "),
            None => "*".to_string(),
        };

        let order_by = self
            .sort
            .iter()
            .map(|key| {
                let dir = match key.direction {
                    SortDirection::Asc => "ASC",
                    SortDirection::Desc => "DESC",
                };
                format!("{} {}", quote_ident(&key.field), dir)
            })
            .collect::<Vec<_>>()
            .join(", ");

        let (where_clause, mut values) = self.where_clause();
        values.push(SqlValue::U64(self.limit));
        values.push(SqlValue::U64(self.offset()));

        CompiledQuery {
            sql: format!(
                "SELECT {} FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
                columns,
                quote_ident(table),
                where_clause,
                order_by
            ),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryMap;

    fn list_query(pairs: &[(&str, &str)]) -> ListQuery {
        let params: QueryMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListQuery::parse(&params, &["name", "designation"])
    }

    #[test]
    fn unfiltered_listing() {
        let q = list_query(&[]);
        assert_eq!(
            q.to_select_sql("employees").sql,
            "SELECT * FROM `employees` ORDER BY `created_at` DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(q.to_count_sql("employees").sql, "SELECT COUNT(*) FROM `employees`");
        assert_eq!(
            q.to_select_sql("employees").values,
            vec![SqlValue::U64(10), SqlValue::U64(0)]
        );
    }

    #[test]
    fn count_and_data_share_predicates() {
        let q = list_query(&[
            ("search", "Eng"),
            ("age[gte]", "30"),
            ("designation[in]", "QA,Dev"),
            ("page", "2"),
            ("limit", "5"),
            ("sort", "-age,name"),
            ("fields", "id,name"),
        ]);

        let count = q.to_count_sql("employees");
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) FROM `employees` WHERE (LOWER(`name`) LIKE ? OR LOWER(`designation`) LIKE ?) \
             AND `age` >= ? AND `designation` IN (?, ?)"
        );
        assert_eq!(
            count.values,
            vec![
                SqlValue::String("%eng%".into()),
                SqlValue::String("%eng%".into()),
                SqlValue::F64(30.0),
                SqlValue::String("QA".into()),
                SqlValue::String("Dev".into()),
            ]
        );

        let data = q.to_select_sql("employees");
        assert_eq!(
            data.sql,
            "SELECT `id`, `name` FROM `employees` WHERE (LOWER(`name`) LIKE ? OR LOWER(`designation`) LIKE ?) \
             AND `age` >= ? AND `designation` IN (?, ?) ORDER BY `age` DESC, `name` ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(&data.values[..5], &count.values[..]);
        assert_eq!(&data.values[5..], &[SqlValue::U64(5), SqlValue::U64(5)]);
    }

    #[test]
    fn ne_binds_raw_text() {
        let q = list_query(&[("age[ne]", "31")]);
        let count = q.to_count_sql("employees");
        assert_eq!(count.sql, "SELECT COUNT(*) FROM `employees` WHERE `age` != ?");
        assert_eq!(count.values, vec![SqlValue::String("31".into())]);
    }

    #[test]
    fn hostile_identifiers_stay_quoted() {
        let q = list_query(&[("name` = 1 OR `1", "x")]);
        assert_eq!(
            q.to_count_sql("employees").sql,
            "SELECT COUNT(*) FROM `employees` WHERE `name`` = 1 OR ``1` = ?"
        );
    }
}
