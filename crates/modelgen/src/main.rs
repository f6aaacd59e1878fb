use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "lite-modelgen")]
#[command(about = "Generate lite_datastore models from an sqlite database", long_about = None)]
struct Args {
    /// Log at debug level.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one model file per table, plus a mod.rs.
    Models {
        /// Database to read the tables from.
        #[arg(long)]
        db_path: Utf8PathBuf,
        /// Directory to write into.  Created if missing.
        #[arg(long, default_value = ".")]
        output_path: Utf8PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    lite_logging::log_to_stderr_with_level(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    match args.command {
        Command::Models {
            db_path,
            output_path,
        } => {
            let written = lite_modelgen::generate_model_files(&db_path, &output_path)?;
            for path in written {
                println!("{}", path);
            }
        }
    }

    Ok(())
}
