//! Records.
//!
//! A model is a struct which maps to one table: each field is a column, declared in column order, and zero or more
//! fields form the primary key.  The description of the table is `'static` data produced at compile time, usually by
//! `#[derive(Model)]`, so nothing about a model is discovered at runtime.
//!
//! A [Record] wraps a model value together with a snapshot of its values taken when the record was made.  Comparing
//! the two gives the fields which changed since the record was loaded, which is what `update_by_record` writes.
use std::ops::{Deref, DerefMut};

use crate::Value;

/// A column in a table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ColumnDescriptor {
    name: &'static str,
    primary_key: bool,
    nullable: bool,
}

/// Description of a table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableDescriptor {
    name: &'static str,
    columns: &'static [ColumnDescriptor],
    primary_keys: &'static [&'static str],
}

impl ColumnDescriptor {
    pub const fn new(name: &'static str, primary_key: bool, nullable: bool) -> Self {
        Self {
            name,
            primary_key,
            nullable,
        }
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl TableDescriptor {
    /// Describe a table.
    ///
    /// `primary_keys` must list the names of the columns marked as primary keys, in column order.  The derive
    /// guarantees this; hand-written descriptors are on their own.
    pub const fn new(
        name: &'static str,
        columns: &'static [ColumnDescriptor],
        primary_keys: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            columns,
            primary_keys,
        }
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = &'static ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().map(|c| c.name)
    }

    pub fn primary_key_names(&self) -> &'static [&'static str] {
        self.primary_keys
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// A struct which maps to a table.
///
/// Usually implemented with `#[derive(Model)]`.
pub trait Model: Sized {
    const TABLE: TableDescriptor;

    /// The values of all fields, in column order.
    fn values(&self) -> Vec<Value>;

    /// Build an instance from a row which has the table's columns in column order.
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;

    fn table_name() -> &'static str {
        Self::TABLE.get_name()
    }

    fn field_names() -> Vec<&'static str> {
        Self::TABLE.column_names().collect()
    }

    fn primary_key_names() -> &'static [&'static str] {
        Self::TABLE.primary_key_names()
    }

    fn has_primary_key() -> bool {
        !Self::primary_key_names().is_empty()
    }

    /// `(field, value)` pairs in column order.
    fn named_values(&self) -> Vec<(&'static str, Value)> {
        Self::TABLE.column_names().zip(self.values()).collect()
    }

    /// `(field, value)` pairs of the primary key, in column order.
    fn primary_key_values(&self) -> Vec<(&'static str, Value)> {
        let pks = Self::primary_key_names();
        self.named_values()
            .into_iter()
            .filter(|(n, _)| pks.contains(n))
            .collect()
    }
}

/// A model value plus the snapshot used for dirty tracking.
///
/// The snapshot is taken once, in [Record::new], and only refreshed by [Record::resnapshot].  Records compare equal
/// when their models do; snapshots are not compared.
#[derive(Clone, Debug)]
pub struct Record<M: Model> {
    model: M,
    snapshot: Vec<Value>,
}

impl<M: Model> Record<M> {
    pub fn new(model: M) -> Self {
        let snapshot = model.values();
        Record { model, snapshot }
    }

    /// The fields whose current value differs from the snapshot, with their current values, in column order.
    pub fn changed_fields(&self) -> Vec<(&'static str, Value)> {
        self.model
            .named_values()
            .into_iter()
            .zip(self.snapshot.iter())
            .filter(|((_, now), then)| now != *then)
            .map(|(pair, _)| pair)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.model
            .values()
            .iter()
            .zip(self.snapshot.iter())
            .any(|(now, then)| now != then)
    }

    /// Make the current values the new baseline.
    pub fn resnapshot(&mut self) {
        self.snapshot = self.model.values();
    }

    pub fn get(&self) -> &M {
        &self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }
}

impl<M: Model> From<M> for Record<M> {
    fn from(model: M) -> Self {
        Record::new(model)
    }
}

impl<M: Model> Deref for Record<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M: Model> DerefMut for Record<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.model
    }
}

impl<M: Model + PartialEq> PartialEq for Record<M> {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
    }
}

impl<M: Model + PartialEq> PartialEq<M> for Record<M> {
    fn eq(&self, other: &M) -> bool {
        self.model == *other
    }
}
