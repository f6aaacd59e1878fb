//! Reading table and column metadata out of a database.
use rusqlite::{params, Connection};

use crate::Column;

/// User tables, in the order they were created.  sqlite's internal tables are skipped.
pub fn list_table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY rowid",
    )?;
    let names = stmt.query_map([], |row| row.get(0))?;
    names.collect()
}

/// The columns of `table`, in column order.  An unknown table has no columns.
pub fn list_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<Column>> {
    let mut stmt = conn.prepare(
        r#"SELECT cid, name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#,
    )?;
    let columns = stmt.query_map(params![table], |row| {
        Ok(Column {
            index: row.get(0)?,
            name: row.get(1)?,
            declared_type: row.get(2)?,
            not_null: row.get(3)?,
            default_value: row.get(4)?,
            primary_key: row.get(5)?,
        })
    })?;
    columns.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE users (
                id INTEGER NOT NULL PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT
            );
            CREATE TABLE user_edited_histories (
                datetime TEXT NOT NULL,
                note TEXT DEFAULT 'none'
            );
            CREATE TABLE order_lines (
                order_id INTEGER NOT NULL,
                line_no INTEGER NOT NULL,
                PRIMARY KEY (order_id, line_no)
            );
            CREATE INDEX users_by_name ON users(name);
            CREATE TABLE counters (id INTEGER PRIMARY KEY AUTOINCREMENT);
            "#,
        )
        .unwrap();
        conn
    }

    fn column(
        index: i64,
        name: &str,
        declared_type: &str,
        not_null: bool,
        default_value: Option<&str>,
        primary_key: u32,
    ) -> Column {
        Column {
            index,
            name: name.into(),
            declared_type: declared_type.into(),
            not_null,
            default_value: default_value.map(Into::into),
            primary_key,
        }
    }

    #[test]
    fn table_names_skip_internal_tables() {
        // AUTOINCREMENT creates sqlite_sequence.
        let names = list_table_names(&test_connection()).unwrap();
        assert_eq!(
            names,
            vec!["users", "user_edited_histories", "order_lines", "counters"]
        );
    }

    #[test]
    fn columns_with_primary_key() {
        let got = list_columns(&test_connection(), "users").unwrap();
        assert_eq!(
            got,
            vec![
                column(0, "id", "INTEGER", true, None, 1),
                column(1, "name", "TEXT", true, None, 0),
                column(2, "phone", "TEXT", true, None, 0),
                column(3, "address", "TEXT", false, None, 0),
            ]
        );
    }

    #[test]
    fn columns_without_primary_key() {
        let got = list_columns(&test_connection(), "user_edited_histories").unwrap();
        assert_eq!(
            got,
            vec![
                column(0, "datetime", "TEXT", true, None, 0),
                column(1, "note", "TEXT", false, Some("'none'"), 0),
            ]
        );
    }

    #[test]
    fn composite_key_positions() {
        let got = list_columns(&test_connection(), "order_lines").unwrap();
        assert_eq!(
            got.iter().map(|c| c.primary_key).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(got.iter().all(Column::is_primary_key));
    }

    #[test]
    fn unknown_table_has_no_columns() {
        assert!(list_columns(&test_connection(), "nope").unwrap().is_empty());
    }
}
