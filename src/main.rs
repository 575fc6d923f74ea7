//! Blobstash CLI - interactive shell over the embedded blob store

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use blobstash::config::{self, StoreConfig};
use blobstash::storage::validate_name;
use blobstash::{BlobStore, ContentType, ItemRef, ui};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "blobstash")]
#[command(version)]
#[command(about = "Embedded blob store - keeps small text and image files in a single SQLite table")]
#[command(long_about = r#"
Blobstash stores small files as base64 rows in a single SQLite table and
extracts them back into a working "dock" directory.

Example usage:
  blobstash init
  blobstash            # interactive shell: l)ist o)pen s)tore d)elete e)xit
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and create the store and dock directories
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Run the interactive shell (the default when no subcommand is given)
    Shell,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Init { force } => run_init(&config_path, force),
        Commands::Shell => {
            let config = config::load_config(Some(&config_path))?.unwrap_or_default();
            run_shell(&config)
        }
    }
}

fn run_init(config_path: &Path, force: bool) -> anyhow::Result<()> {
    let config = StoreConfig::default();
    config::write_config(config_path, &config, force)?;
    config.ensure_dirs()?;
    BlobStore::open(&config.db_path())?;

    ui::success(&format!(
        "Initialized store in {} (config: {})",
        config.store_dir.display(),
        config_path.display()
    ));
    Ok(())
}

fn run_shell(config: &StoreConfig) -> anyhow::Result<()> {
    config.ensure_dirs()?;
    let store = BlobStore::open(&config.db_path())?;

    ui::banner(
        &format!("Blobstash {}", env!("CARGO_PKG_VERSION")),
        "Commands: l)ist  o)pen  s)tore  d)elete  e)xit",
    );

    loop {
        let choice = prompt("> ")?;
        if choice == "e" {
            break;
        }

        let result = match choice.as_str() {
            "l" => cmd_list(&store),
            "o" => cmd_open(&store, config),
            "s" => cmd_store(&store, config),
            "d" => cmd_delete(&store),
            "" => Ok(()),
            other => {
                ui::warn(&format!("Unknown command: {other} (l, o, s, d, e)"));
                Ok(())
            }
        };

        // Classified failures are recoverable; the loop resumes. Guard
        // misuse is the one fatal case and propagates out.
        if let Err(err) = result {
            if matches!(err, blobstash::Error::GuardPoisoned) {
                tracing::error!("storage guard poisoned; shutting down");
                return Err(err.into());
            }
            ui::error(&err.to_string());
        }
    }

    Ok(())
}

fn cmd_list(store: &BlobStore) -> blobstash::Result<()> {
    let names = store.list()?;
    if names.is_empty() {
        ui::info("Store", "empty");
    } else {
        println!("{}", ui::item_table(&names));
    }
    Ok(())
}

fn cmd_open(store: &BlobStore, config: &StoreConfig) -> blobstash::Result<()> {
    let token = prompt("File name or number to extract? ")?;
    let kind = prompt("File type (TEXT or IMAGE)? ")?.parse::<ContentType>()?;

    let (name, raw) = store.retrieve(&ItemRef::parse(&token), kind)?;
    let target = config.dock_dir.join(&name);
    std::fs::write(&target, raw)?;

    ui::success(&format!("Extracted {name} to {}", target.display()));
    Ok(())
}

fn cmd_delete(store: &BlobStore) -> blobstash::Result<()> {
    let token = prompt("File name or number to delete? ")?;
    // Token validation only; deletion itself is best-effort by name
    prompt("File type (TEXT or IMAGE)? ")?.parse::<ContentType>()?;

    let name = store.delete(&ItemRef::parse(&token))?;
    ui::success(&format!("Deleted {name}"));
    Ok(())
}

fn cmd_store(store: &BlobStore, config: &StoreConfig) -> blobstash::Result<()> {
    let path = prompt("Absolute directory to ingest, or empty for the dock? ")?;
    let source_dir = if path.is_empty() {
        config.dock_dir.clone()
    } else {
        PathBuf::from(&path)
    };
    if !source_dir.is_dir() {
        ui::warn(&format!("Not a directory: {}", source_dir.display()));
        return Ok(());
    }

    let cleanup = match prompt("Delete source files after storing? (y/n) ")?.as_str() {
        "y" => true,
        "n" => false,
        other => {
            ui::warn(&format!("Improper input, pick y or n (got {other:?})"));
            return Ok(());
        }
    };

    let mut stored = 0usize;
    for entry in walkdir::WalkDir::new(&source_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_name = entry.file_name().to_string_lossy();
        let Some((name, ext)) = normalize_file_name(&file_name) else {
            ui::warn(&format!("Skipping {file_name}: unusable file name"));
            continue;
        };

        let raw = std::fs::read(entry.path())?;
        match store.store(&name, &source_dir, &raw, &ext) {
            Ok(()) => {
                ui::success(&format!("Stored {name}"));
                stored += 1;
                if cleanup {
                    std::fs::remove_file(entry.path())?;
                }
            }
            Err(err @ blobstash::Error::GuardPoisoned) => return Err(err),
            Err(err) => ui::error(&format!("{file_name}: {err}")),
        }
    }

    ui::info("Files stored", &stored.to_string());
    Ok(())
}

/// Split a file name into storable name and extension, collapsing extra dots
/// out of the stem (`archive.tar.gz` becomes `archivetar.gz`). Returns None
/// for names that cannot be made storable.
fn normalize_file_name(file_name: &str) -> Option<(String, String)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    let stem: String = stem.chars().filter(|c| *c != '.').collect();
    if stem.is_empty() {
        return None;
    }

    let name = format!("{stem}.{ext}");
    validate_name(&name).ok()?;
    Some((name, ext))
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
