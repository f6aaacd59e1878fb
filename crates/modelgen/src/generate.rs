use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::*;
use rusqlite::{Connection, OpenFlags};

use crate::metadata::{list_columns, list_table_names};
use crate::render::{render_mod, render_model, ModelSource};

/// Render a model for every table in the database at `db_path`.
///
/// The database is opened read-only and must already exist.
pub fn render_models(db_path: &Utf8Path) -> Result<Vec<ModelSource>> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Unable to open database {}", db_path))?;

    let tables = list_table_names(&conn).context("Unable to list tables")?;
    let mut models = Vec::with_capacity(tables.len());
    let mut seen: HashMap<String, String> = HashMap::new();

    for table in tables {
        let columns =
            list_columns(&conn, &table).with_context(|| format!("Unable to read the columns of {}", table))?;
        let model = render_model(&table, &columns)
            .with_context(|| format!("Unable to render the model for {}", table))?;

        if let Some(other) = seen.insert(model.module.clone(), table.clone()) {
            bail!(
                "Tables {} and {} would both generate {}",
                other,
                table,
                model.file_name()
            );
        }
        models.push(model);
    }

    conn.close().map_err(|(_, e)| e)?;
    Ok(models)
}

/// Write one file per table, plus a `mod.rs`, into `output_dir`, which is created if missing.
///
/// Returns the paths written, `mod.rs` last.
pub fn generate_model_files(db_path: &Utf8Path, output_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let models = render_models(db_path)?;
    info!(
        "Generating {} models from {} into {}",
        models.len(),
        db_path,
        output_dir
    );

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Unable to create {}", output_dir))?;

    let mut written = vec![];
    let mut write = |name: String, contents: &str| -> Result<()> {
        let path = output_dir.join(name);
        std::fs::write(&path, contents).with_context(|| format!("Unable to write {}", path))?;
        debug!("Wrote {}", path);
        written.push(path);
        Ok(())
    };

    for model in models.iter() {
        write(model.file_name(), &model.source)?;
    }
    write("mod.rs".to_string(), &render_mod(&models)?)?;

    Ok(written)
}
