//! Rendering model source with tera.
use anyhow::{bail, Result};
use log::*;
use serde::Serialize;

use crate::naming::{escape_identifier, is_valid_identifier, module_name, struct_name};
use crate::Column;

const MODEL_TEMPLATE: &str = r#"//! Generated from the `{{ table }}` table.
use lite_datastore::Model;

#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "{{ table | addslashes }}")]
pub struct {{ struct_name }} {
{%- for f in fields %}
{%- if f.primary_key %}
    #[model(primary_key)]
{%- endif %}
    pub {{ f.name }}: {{ f.ty }},
{%- endfor %}
}
"#;

const MOD_TEMPLATE: &str = r#"//! Generated models.
{% for m in modules %}
mod {{ m.ident }};
{%- endfor %}
{% for m in modules %}
pub use {{ m.ident }}::{{ m.struct_name }};
{%- endfor %}
"#;

/// The rendered model for one table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelSource {
    pub table: String,
    /// Module name and file stem.
    pub module: String,
    pub struct_name: String,
    pub source: String,
}

impl ModelSource {
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }
}

#[derive(Serialize)]
struct FieldContext {
    name: String,
    ty: String,
    primary_key: bool,
}

#[derive(Serialize)]
struct ModuleContext<'a> {
    ident: String,
    struct_name: &'a str,
}

/// Render the model for `table`.
///
/// Column names become field names, and the derive names each column after its field, so every column name must
/// already be an identifier.  The same holds for the module name derived from the table.
pub fn render_model(table: &str, columns: &[Column]) -> Result<ModelSource> {
    let module = module_name(table);
    if !is_valid_identifier(&module) {
        bail!(
            "Table {} would be generated as module {:?}, which is not a valid Rust identifier",
            table,
            module
        );
    }
    if let Some(c) = columns.iter().find(|c| !is_valid_identifier(&c.name)) {
        bail!(
            "Column {:?} of table {} is not a valid Rust identifier",
            c.name,
            table
        );
    }

    let struct_name = struct_name(table);
    let fields = columns
        .iter()
        .map(|c| FieldContext {
            name: escape_identifier(&c.name),
            ty: c.field_type(),
            primary_key: c.is_primary_key(),
        })
        .collect::<Vec<_>>();

    let mut context = tera::Context::new();
    context.insert("table", table);
    context.insert("struct_name", &struct_name);
    context.insert("fields", &fields);

    let source = tera::Tera::one_off(MODEL_TEMPLATE, &context, false)?;
    debug!("Model for {}: {}", table, source);

    Ok(ModelSource {
        table: table.to_string(),
        module,
        struct_name,
        source,
    })
}

/// The `mod.rs` declaring every module in `models` and re-exporting its struct.
pub fn render_mod(models: &[ModelSource]) -> tera::Result<String> {
    let modules = models
        .iter()
        .map(|m| ModuleContext {
            ident: escape_identifier(&m.module),
            struct_name: &m.struct_name,
        })
        .collect::<Vec<_>>();

    let mut context = tera::Context::new();
    context.insert("modules", &modules);
    tera::Tera::one_off(MOD_TEMPLATE, &context, false)
}
