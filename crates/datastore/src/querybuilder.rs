//! Building SQL text and parameters.
//!
//! Everything here is pure: table metadata and clauses go in, SQL and parameters come out.  Fields always appear in
//! the order they were given (column order for records), so the same input always produces the same SQL.
use itertools::Itertools;

use crate::errors::{Result, UsageError};
use crate::{Model, ParamStyle, Params, Record};

/// A statement and the parameters to run it with.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Params,
}

/// One insert statement, run once per entry of `rows`.
///
/// Bulk inserts use a named template so that every row binds by column name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulkInsert {
    pub sql: String,
    pub rows: Vec<Params>,
}

impl BulkInsert {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn with_where(mut sql: String, clause: Option<&str>) -> String {
    if let Some(c) = clause {
        sql.push_str(" WHERE ");
        sql.push_str(c);
    }
    sql
}

/// `a = :a AND b = :b`.
fn named_equalities<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(|f| format!("{} = :{}", f, f))
        .join(" AND ")
}

fn insert_prefix(table: &str, or_ignore: bool) -> String {
    format!(
        "INSERT{} INTO {}",
        if or_ignore { " OR IGNORE" } else { "" },
        table
    )
}

pub fn build_select(table: &str, clause: Option<&str>) -> String {
    with_where(format!("SELECT * FROM {}", table), clause)
}

/// `SELECT * FROM table WHERE k1 = ? AND k2 = ?`, keeping the order of `key_names`.
pub fn build_select_by_keys(table: &str, key_names: &[&str]) -> Result<String> {
    if key_names.is_empty() {
        return Err(UsageError::EmptyKeyList.into());
    }

    let clause = key_names.iter().map(|k| format!("{} = ?", k)).join(" AND ");
    Ok(build_select(table, Some(&clause)))
}

/// `INSERT [OR IGNORE] INTO table VALUES (?, ...)` with the model's values in column order.
pub fn build_insert<M: Model>(model: &M, or_ignore: bool) -> Query {
    let placeholders = std::iter::repeat("?")
        .take(M::TABLE.column_count())
        .join(", ");
    Query {
        sql: format!(
            "{} VALUES ({})",
            insert_prefix(M::table_name(), or_ignore),
            placeholders
        ),
        params: Params::Positional(model.values()),
    }
}

/// Build one named insert template and a parameter set per model.
///
/// No models gives an empty statement with no rows.
pub fn build_bulk_insert<M: Model>(models: &[M], or_ignore: bool) -> BulkInsert {
    if models.is_empty() {
        return Default::default();
    }

    let placeholders = M::TABLE.column_names().map(|c| format!(":{}", c)).join(", ");
    let sql = format!(
        "{} VALUES ({})",
        insert_prefix(M::table_name(), or_ignore),
        placeholders
    );
    let rows = models
        .iter()
        .map(|m| {
            Params::Named(
                m.named_values()
                    .into_iter()
                    .map(|(n, v)| (n.to_string(), v))
                    .collect(),
            )
        })
        .collect();

    BulkInsert { sql, rows }
}

/// `UPDATE table SET f1 = <placeholder>, ... [WHERE clause]`.
///
/// `style` must match the style of the clause's parameters; the caller knows which one it is passing.
pub fn build_update(
    table: &str,
    fields: &[&str],
    clause: Option<&str>,
    style: ParamStyle,
) -> Result<String> {
    if fields.is_empty() {
        return Err(UsageError::EmptyUpdate.into());
    }

    let set = fields
        .iter()
        .map(|f| match style {
            ParamStyle::Positional => format!("{} = ?", f),
            ParamStyle::Named => format!("{} = :{}", f, f),
        })
        .join(", ");
    Ok(with_where(format!("UPDATE {} SET {}", table, set), clause))
}

/// Update the changed fields of a record, matching on its primary key.
///
/// The record must have a primary key, at least one changed field, and its primary key fields must not be among the
/// changes: the key is what finds the row.
pub fn build_update_by_record<M: Model>(record: &Record<M>) -> Result<Query> {
    let pks = M::primary_key_names();
    if pks.is_empty() {
        return Err(UsageError::NoPrimaryKey.into());
    }

    let changed = record.changed_fields();
    if changed.is_empty() {
        return Err(UsageError::NothingToUpdate.into());
    }
    if let Some((name, _)) = changed.iter().find(|(n, _)| pks.contains(n)) {
        return Err(UsageError::PrimaryKeyChanged(name.to_string()).into());
    }

    let fields = changed.iter().map(|(n, _)| *n).collect::<Vec<_>>();
    let where_clause = named_equalities(pks.iter().copied());
    let sql = build_update(
        M::table_name(),
        &fields,
        Some(&where_clause),
        ParamStyle::Named,
    )?;

    let params = changed
        .into_iter()
        .chain(record.primary_key_values())
        .map(|(n, v)| (n.to_string(), v))
        .collect();

    Ok(Query {
        sql,
        params: Params::Named(params),
    })
}

pub fn build_delete(table: &str, clause: Option<&str>) -> String {
    with_where(format!("DELETE FROM {}", table), clause)
}

/// Delete the row matching the model: by primary key if there is one, otherwise by every column.
pub fn build_delete_by_record<M: Model>(model: &M) -> Query {
    let matched = if M::has_primary_key() {
        model.primary_key_values()
    } else {
        model.named_values()
    };

    let clause = named_equalities(matched.iter().map(|(n, _)| *n));
    Query {
        sql: build_delete(M::table_name(), Some(&clause)),
        params: Params::Named(
            matched
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        ),
    }
}
