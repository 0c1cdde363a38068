//! Renders conditions and pagination into a PostgreSQL `SELECT`
//!
//! ```text
//! SELECT <columns> FROM <table>
//! WHERE deleted_at IS NULL [AND <condition>]...
//! [ORDER BY <key>, ...] [LIMIT $n] [OFFSET $n]
//! ```
//!
//! Values are always bound, never interpolated. Table and column names come
//! from `&'static str` constants or from [`SortKey`]s, which only admit plain
//! identifiers.

use sqlx::{Postgres, QueryBuilder};

use super::{Condition, Pagination, SortError, SortKey, Value};

/// Escapes `LIKE` metacharacters so the needle matches literally
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: Value) {
    match value {
        Value::Text(v) => builder.push_bind(v),
        Value::Uuid(v) => builder.push_bind(v),
        Value::Float(v) => builder.push_bind(v),
        Value::Int(v) => builder.push_bind(v),
        Value::Timestamp(v) => builder.push_bind(v),
    };
}

/// Appends `AND <condition>` for each condition
pub fn push_conditions(builder: &mut QueryBuilder<'static, Postgres>, conditions: Vec<Condition>) {
    for condition in conditions {
        builder.push(" AND ");
        match condition {
            Condition::Contains { column, needle } => {
                builder.push(column).push(" ILIKE ").push_bind(like_pattern(&needle));
            }
            Condition::Equals { column, value } => {
                builder.push(column).push(" = ");
                push_value(builder, value);
            }
            Condition::AtLeast { column, value } => {
                builder.push(column).push(" >= ");
                push_value(builder, value);
            }
            Condition::AtMost { column, value } => {
                builder.push(column).push(" <= ");
                push_value(builder, value);
            }
        }
    }
}

/// Appends `ORDER BY`, `LIMIT` and `OFFSET` as needed
pub fn push_pagination(
    builder: &mut QueryBuilder<'static, Postgres>,
    keys: &[SortKey],
    pagination: &Pagination,
) {
    if !keys.is_empty() {
        builder.push(" ORDER BY ");
        let mut separated = builder.separated(", ");
        for key in keys {
            separated.push(format!("{} {}", key.column, key.direction()));
        }
    }

    if let Some(limit) = pagination.effective_limit() {
        builder.push(" LIMIT ").push_bind(limit as i64);
    }

    let offset = pagination.effective_offset();
    if offset > 0 {
        builder.push(" OFFSET ").push_bind(offset as i64);
    }
}

/// Builds the full list query for a table
///
/// # Errors
///
/// Returns `SortError` if the sort expression is malformed.
pub fn select_live(
    table: &'static str,
    columns: &'static str,
    conditions: Vec<Condition>,
    pagination: &Pagination,
) -> Result<QueryBuilder<'static, Postgres>, SortError> {
    let keys = pagination.sort_keys()?;

    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE deleted_at IS NULL",
        columns, table
    ));
    push_conditions(&mut builder, conditions);
    push_pagination(&mut builder, &keys, pagination);

    Ok(builder)
}
