//! The database wraps a rusqlite connection and maps rows to and from models.
use std::path::Path;

use log::*;

use crate::errors::{Result, UsageError};
use crate::querybuilder::{self, Query};
use crate::{DatabaseConfig, IsolationLevel, Model, ParamStyle, Params, Record, Value};

pub struct Database {
    conn: rusqlite::Connection,
}

/// A clause and its parameters must be given together or not at all.
///
/// Every operation which takes a clause checks this before building any SQL.
pub fn validate_clause(clause: Option<&str>, params: Option<&Params>) -> Result<()> {
    if clause.is_some() != params.is_some() {
        return Err(UsageError::ClauseParamsMismatch.into());
    }
    Ok(())
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Database::open_with_config(path, &Default::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: &DatabaseConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {}", path.display());
        let conn = rusqlite::Connection::open(path)?;
        Database::with_connection(conn, config)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Database::with_connection(conn, &Default::default())
    }

    /// Build a database from an already-existing connection.
    pub fn with_connection(conn: rusqlite::Connection, config: &DatabaseConfig) -> Result<Self> {
        conn.execute_batch(&config.initial_sql()?)?;
        Ok(Database { conn })
    }

    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, reporting any failure to do so.  Dropping also closes, but silently.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    pub fn begin(&self, isolation_level: IsolationLevel) -> Result<()> {
        self.execute_batch(&format!("BEGIN {}", isolation_level))
    }

    pub fn commit(&self) -> Result<()> {
        self.execute_batch("COMMIT")
    }

    pub fn rollback(&self) -> Result<()> {
        self.execute_batch("ROLLBACK")
    }

    pub fn is_in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        debug!("sql executed: {}", sql);
        Ok(())
    }

    /// Run a statement which returns no rows, returning the number of rows it changed.
    pub fn execute(&self, sql: &str, params: &Params) -> Result<usize> {
        let mut statement = self.conn.prepare_cached(sql)?;
        params.bind(&mut statement)?;
        let changed = statement.raw_execute()?;
        debug!("sql executed: {}, params: {}", sql, params);
        Ok(changed)
    }

    /// Run a query, mapping at most `limit` rows.
    fn query<M: Model>(
        &self,
        sql: &str,
        params: &Params,
        limit: Option<usize>,
    ) -> Result<Vec<Record<M>>> {
        let mut statement = self.conn.prepare_cached(sql)?;
        params.bind(&mut statement)?;

        let mut ret = vec![];
        let mut rows = statement.raw_query();
        while let Some(r) = rows.next()? {
            ret.push(Record::new(M::from_row(r)?));
            if limit.map(|l| ret.len() >= l).unwrap_or(false) {
                break;
            }
        }

        debug!("sql executed: {}, params: {}", sql, params);
        Ok(ret)
    }

    fn query_clause<M: Model>(
        &self,
        clause: Option<&str>,
        params: Option<Params>,
        limit: Option<usize>,
    ) -> Result<Vec<Record<M>>> {
        validate_clause(clause, params.as_ref())?;
        let sql = querybuilder::build_select(M::table_name(), clause);
        self.query(&sql, &params.unwrap_or_default(), limit)
    }

    /// Find a row by primary key.
    ///
    /// `primary_key_values` are given in the order of the model's primary key fields.
    pub fn find<M: Model>(&self, primary_key_values: &[Value]) -> Result<Option<Record<M>>> {
        let pks = M::primary_key_names();
        if pks.is_empty() {
            return Err(UsageError::FindWithoutPrimaryKey.into());
        }
        if primary_key_values.len() != pks.len() {
            return Err(UsageError::PrimaryKeyCountMismatch {
                expected: pks.len(),
                got: primary_key_values.len(),
            }
            .into());
        }

        let sql = querybuilder::build_select_by_keys(M::table_name(), pks)?;
        let params = Params::Positional(primary_key_values.to_vec());
        Ok(self.query(&sql, &params, Some(1))?.into_iter().next())
    }

    /// The first row matching `clause`, or the first row of the table without one.
    pub fn find_by<M: Model>(
        &self,
        clause: Option<&str>,
        params: Option<Params>,
    ) -> Result<Option<Record<M>>> {
        Ok(self
            .query_clause(clause, params, Some(1))?
            .into_iter()
            .next())
    }

    /// Every row matching `clause`, or the whole table without one.
    pub fn find_all<M: Model>(
        &self,
        clause: Option<&str>,
        params: Option<Params>,
    ) -> Result<Vec<Record<M>>> {
        self.query_clause(clause, params, None)
    }

    /// Insert a model, returning the number of rows inserted.
    ///
    /// With `or_ignore`, a row colliding with an existing key is skipped and 0 is returned; without, the collision is
    /// an error.
    pub fn insert<M: Model>(&self, model: &M, or_ignore: bool) -> Result<usize> {
        let Query { sql, params } = querybuilder::build_insert(model, or_ignore);
        self.execute(&sql, &params)
    }

    /// Insert all the models with one prepared statement, returning the total number of rows inserted.
    ///
    /// This can fail partway through, in which case earlier rows stay inserted until the surrounding transaction is
    /// rolled back.
    pub fn bulk_insert<M: Model>(&self, models: &[M], or_ignore: bool) -> Result<usize> {
        let bulk = querybuilder::build_bulk_insert(models, or_ignore);
        if bulk.is_empty() {
            return Ok(0);
        }

        let mut statement = self.conn.prepare_cached(&bulk.sql)?;
        let mut total = 0;
        // The statement can be reused: every row binds all parameters.
        for params in bulk.rows.iter() {
            params.bind(&mut statement)?;
            total += statement.raw_execute()?;
        }

        debug!(
            "sql executed: {}, params: {}",
            bulk.sql,
            itertools::join(bulk.rows.iter(), ", ")
        );
        Ok(total)
    }

    /// Set `fields` on every row matching `clause`, returning the number of rows updated.
    ///
    /// The set values use the placeholder style of `params`; with no clause they are named.
    pub fn update<M: Model>(
        &self,
        fields: &[(&str, Value)],
        clause: Option<&str>,
        params: Option<Params>,
    ) -> Result<usize> {
        validate_clause(clause, params.as_ref())?;

        let style = params
            .as_ref()
            .map(|p| p.style())
            .unwrap_or(ParamStyle::Named);
        let names = fields.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        let sql = querybuilder::build_update(M::table_name(), &names, clause, style)?;

        let set_params = match style {
            ParamStyle::Positional => Params::Positional(fields.iter().map(|(_, v)| v.clone()).collect()),
            ParamStyle::Named => Params::Named(
                fields
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.clone()))
                    .collect(),
            ),
        };
        let all_params = match params {
            Some(p) => set_params.extend(p)?,
            None => set_params,
        };

        self.execute(&sql, &all_params)
    }

    /// Write a record's changed fields, matching on its primary key.
    ///
    /// If at least one row changed, the record's snapshot is refreshed, so calling this again without touching the
    /// record does nothing and returns 0.
    pub fn update_by_record<M: Model>(&self, record: &mut Record<M>) -> Result<usize> {
        if !M::has_primary_key() {
            return Err(UsageError::NoPrimaryKey.into());
        }
        if !record.is_dirty() {
            debug!("{}: record has no changes, nothing to update", M::table_name());
            return Ok(0);
        }

        let Query { sql, params } = querybuilder::build_update_by_record(record)?;
        let changed = self.execute(&sql, &params)?;
        if changed > 0 {
            record.resnapshot();
        }
        Ok(changed)
    }

    /// Delete every row matching `clause`, or every row without one.
    pub fn delete<M: Model>(&self, clause: Option<&str>, params: Option<Params>) -> Result<usize> {
        validate_clause(clause, params.as_ref())?;
        let sql = querybuilder::build_delete(M::table_name(), clause);
        self.execute(&sql, &params.unwrap_or_default())
    }

    /// Delete the row matching the model: by primary key, or by every column if there is no primary key.
    pub fn delete_by_record<M: Model>(&self, model: &M) -> Result<usize> {
        let Query { sql, params } = querybuilder::build_delete_by_record(model);
        self.execute(&sql, &params)
    }
}
