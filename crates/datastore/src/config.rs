//! Connection configuration.
//!
//! Every connection runs a short block of pragmas when it is opened.  The block is a tera template rendered from
//! [DatabaseConfig], which can be built in code or deserialized (e.g. from JSON).
use derive_more::Display;
use log::*;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    #[display(fmt = "WAL")]
    Wal,
    #[display(fmt = "DELETE")]
    Delete,
    #[display(fmt = "MEMORY")]
    Memory,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// How long a statement waits on a locked database before failing with busy.
    pub busy_timeout_ms: u32,
    pub foreign_keys: bool,
    /// Left as the file already has it when unset.  The mode is stored in the database file, and in WAL mode an
    /// exclusive transaction no longer keeps readers out.
    pub journal_mode: Option<JournalMode>,
    /// Page cache size.  Sqlite's default is only a couple megabytes.
    pub cache_size_kib: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            busy_timeout_ms: 1000,
            foreign_keys: true,
            journal_mode: None,
            cache_size_kib: 100000,
        }
    }
}

const INITIAL_SQL_TEMPLATE: &str = r#"
PRAGMA busy_timeout = {{ busy_timeout_ms }};
PRAGMA cache_size = -{{ cache_size_kib }};
PRAGMA foreign_keys = {% if foreign_keys %}1{% else %}0{% endif %};
{%- if journal_mode %}
PRAGMA journal_mode = {{ journal_mode }};
{%- endif %}
"#;

impl DatabaseConfig {
    /// Parse a config.  Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The SQL to run on every freshly opened connection.
    pub fn initial_sql(&self) -> Result<String> {
        let context = tera::Context::from_serialize(self)?;
        let sql = tera::Tera::one_off(INITIAL_SQL_TEMPLATE, &context, false)?;
        debug!("Initial SQL: {}", sql.trim());
        Ok(sql)
    }
}
