//! The datastore crate.
//!
//! This crate maps flat structs to the rows of a single-file sqlite database.  There are 4 primary entities:
//!
//! - The model, a struct deriving [Model], which knows its table, its columns in order, and its primary key.
//! - The record, which wraps a model loaded from (or headed to) the database and remembers what it looked like when
//!   it was made, so that only changed fields are written back.
//! - The query builder, which turns models and clauses into SQL text and parameters without touching a connection.
//! - The database and the transaction scope: the scope owns a connection, begins a transaction when opened, and rolls
//!   back anything uncommitted when it ends.
//!
//! Clauses are plain SQL supplied by the caller together with their [Params], which are either positional (`?`) or
//! named (`:name`).  This crate assembles SQL; it never parses it, and it does not do joins, migrations, or pooling.
//!
//! ```ignore
//! use lite_datastore::*;
//!
//! #[derive(Clone, Debug, PartialEq, Model)]
//! #[model(table = "users")]
//! struct User {
//!     #[model(primary_key)]
//!     id: i64,
//!     name: String,
//!     address: Option<String>,
//! }
//!
//! let mut scope = TransactionScope::open("app.db", IsolationLevel::Deferred)?;
//! let mut user = scope.find::<User>(&[1.into()])?.expect("user 1 exists");
//! user.name = "Renamed".into();
//! scope.update_by_record(&mut user)?;
//! scope.commit()?;
//! ```

// Lets the derive's `::lite_datastore::` paths resolve inside this crate's own tests.
extern crate self as lite_datastore;

mod config;
mod database;
mod errors;
mod model;
mod params;
pub mod querybuilder;
mod scope;
mod value;

#[cfg(test)]
mod test_models;

pub use config::*;
pub use database::*;
pub use errors::*;
pub use model::*;
pub use params::*;
pub use querybuilder::{BulkInsert, Query};
pub use scope::*;
pub use value::*;

pub use lite_datastore_derive::Model;
pub use rusqlite;
