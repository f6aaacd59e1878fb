//! Transaction scopes.
//!
//! A scope owns one connection for one unit of work.  Opening it begins a transaction; leaving it, by any path, rolls
//! back whatever was not committed and closes the connection.  Committing is always explicit.
use std::ops::{Deref, DerefMut};
use std::path::Path;

use derive_more::Display;
use log::*;

use crate::errors::Result;
use crate::{Database, DatabaseConfig};

/// How eagerly a transaction takes sqlite's locks.
#[derive(Copy, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum IsolationLevel {
    /// No lock until the first read or write.
    #[default]
    #[display(fmt = "DEFERRED")]
    Deferred,
    /// Take the write lock when the transaction begins.  Other connections may still read.
    #[display(fmt = "IMMEDIATE")]
    Immediate,
    /// Take an exclusive lock when the transaction begins, keeping other connections from reading too.
    ///
    /// Only holds in the rollback journal modes; in WAL mode sqlite treats this like [IsolationLevel::Immediate].
    #[display(fmt = "EXCLUSIVE")]
    Exclusive,
}

/// A transaction like that from rusqlite: drop rolls back, calling commit commits.
///
/// Unlike rusqlite's, committing does not end the scope.  A new transaction at the same level begins right away, so
/// anything done after a commit is again rolled back unless committed too.  The scope dereferences to [Database] for
/// all data access.
pub struct TransactionScope {
    // Only `None` inside `finish`.
    db: Option<Database>,
    isolation_level: IsolationLevel,
}

impl TransactionScope {
    pub fn open(path: impl AsRef<Path>, isolation_level: IsolationLevel) -> Result<Self> {
        TransactionScope::open_with_config(path, isolation_level, &Default::default())
    }

    pub fn open_with_config(
        path: impl AsRef<Path>,
        isolation_level: IsolationLevel,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        let db = Database::open_with_config(path, config)?;
        TransactionScope::new(db, isolation_level)
    }

    /// Run a scope over an already-open database.  The database is closed when the scope ends.
    pub fn new(db: Database, isolation_level: IsolationLevel) -> Result<Self> {
        db.begin(isolation_level)?;
        Ok(TransactionScope {
            db: Some(db),
            isolation_level,
        })
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        self.isolation_level
    }

    fn db(&self) -> &Database {
        self.db
            .as_ref()
            .expect("The database is only taken when the scope is finished")
    }

    /// Make everything done so far durable, then keep going in a new transaction.
    pub fn commit(&mut self) -> Result<()> {
        let db = self.db();
        db.commit()?;
        db.begin(self.isolation_level)
    }

    /// Discard everything done since the last commit, then keep going in a new transaction.
    pub fn rollback(&mut self) -> Result<()> {
        let db = self.db();
        db.rollback()?;
        db.begin(self.isolation_level)
    }

    /// End the scope, reporting failures that drop would only log.
    pub fn finish(mut self) -> Result<()> {
        match self.db.take() {
            Some(db) => {
                if db.is_in_transaction() {
                    db.rollback()?;
                }
                db.close()
            }
            None => Ok(()),
        }
    }
}

impl Deref for TransactionScope {
    type Target = Database;

    fn deref(&self) -> &Database {
        self.db()
    }
}

impl DerefMut for TransactionScope {
    fn deref_mut(&mut self) -> &mut Database {
        self.db
            .as_mut()
            .expect("The database is only taken when the scope is finished")
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        // Dropping the database afterwards closes the connection.
        if let Some(db) = self.db.take() {
            if db.is_in_transaction() {
                if let Err(e) = db.rollback() {
                    warn!("Rolling back a transaction scope failed: {}", e);
                }
            }
        }
    }
}

/// Run `work` inside a new scope over the database at `path`.
///
/// Whatever `work` returns, the scope then rolls back anything uncommitted and closes.
pub fn transaction_scope<T>(
    path: impl AsRef<Path>,
    isolation_level: IsolationLevel,
    work: impl FnOnce(&mut TransactionScope) -> Result<T>,
) -> Result<T> {
    let mut scope = TransactionScope::open(path, isolation_level)?;
    let ret = work(&mut scope)?;
    scope.finish()?;
    Ok(ret)
}
