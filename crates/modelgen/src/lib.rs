//! Generates `lite_datastore` model structs from the tables of an existing sqlite database.
//!
//! Each table becomes one file holding one struct deriving `Model`, named after the singular of the table name.  Column
//! types map to Rust types by sqlite's affinity rules, nullable columns become `Option`, and primary key columns are
//! marked as such.
mod column;
mod generate;
pub mod metadata;
pub mod naming;
mod render;

pub use column::*;
pub use generate::*;
pub use render::*;
