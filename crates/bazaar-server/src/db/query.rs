//! SQL assembly for list and count queries.

use crate::request::{FilterValue, ListQuery};
use sqlx::{QueryBuilder, Sqlite};

/// `SELECT * FROM table WHERE ... ORDER BY ... LIMIT ? OFFSET ?`
///
/// Column names come from a static whitelist; values are always bound.
pub(crate) fn select_list(table: &'static str, query: &ListQuery) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {table}"));
    push_filters(&mut builder, &query.filters);

    builder.push(" ORDER BY ");
    for (column, order) in &query.sort {
        builder.push(format!("{column} {}, ", order.as_sql()));
    }
    builder.push("rowid");

    builder.push(" LIMIT ").push_bind(query.limit);
    builder.push(" OFFSET ").push_bind(query.skip);
    builder
}

/// `SELECT COUNT(*) FROM table WHERE ...`
pub(crate) fn count(
    table: &'static str,
    filters: &[(&'static str, FilterValue)],
) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_filters(&mut builder, filters);
    builder
}

fn push_filters(builder: &mut QueryBuilder<'static, Sqlite>, filters: &[(&'static str, FilterValue)]) {
    for (i, (column, value)) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(*column).push(" = ");
        match value {
            FilterValue::Text(text) => builder.push_bind(text.clone()),
            FilterValue::Id(id) => builder.push_bind(*id),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SortOrder;
    use uuid::Uuid;

    #[test]
    fn test_select_list_sql() {
        let query = ListQuery {
            filters: vec![
                ("category", FilterValue::Text("shoes".into())),
                ("user_id", FilterValue::Id(Uuid::nil())),
            ],
            sort: vec![("price", SortOrder::Desc)],
            limit: 10,
            skip: 20,
        };

        let builder = select_list("products", &query);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM products WHERE category = ? AND user_id = ? \
             ORDER BY price DESC, rowid LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn test_count_without_filters() {
        assert_eq!(count("categories", &[]).sql(), "SELECT COUNT(*) FROM categories");
    }
}
