//! mschema CLI - Render database schemas as M-Schema text
//!
//! Usage:
//!   mschema render <db.sqlite> [--table <name>]... [--column <table.column>]...
//!   mschema show <schema.json> [--table <name>]...
//!   mschema cache stats | clear
//!
//! Examples:
//!   mschema render data/shop.sqlite --save dist/shop.json
//!   mschema render data/shop.sqlite -c orders.id -c orders.status --examples 5
//!   mschema show dist/shop.json --type-detail

use clap::{Args, Parser, Subcommand};
use mschema::cache::{CacheKey, SchemaCache};
use mschema::config::Settings;
use mschema::metadata::{SchemaBuilder, SqliteIntrospector};
use mschema::{MSchema, RenderOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::UNIX_EPOCH;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mschema")]
#[command(about = "mschema - Render database schemas as M-Schema text for text-to-SQL prompts")]
#[command(version)]
struct Cli {
    /// Path to a config file (overrides MSCHEMA_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Introspect a SQLite database and print its M-Schema
    Render {
        /// Path to the SQLite database file
        database: PathBuf,

        /// Database id shown in the output (defaults to the file stem)
        #[arg(long)]
        db_id: Option<String>,

        /// Only introspect this namespace (attached database name)
        #[arg(long)]
        namespace: Option<String>,

        /// Write the JSON document to this file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Ignore any cached document and introspect again
        #[arg(long)]
        refresh: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Render a saved JSON document
    Show {
        /// Path to the JSON document
        document: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Manage the document cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show entry count and size
    Stats,
    /// Remove all cached documents
    Clear,
}

#[derive(Args)]
struct FilterArgs {
    /// Tables to include (repeatable, case-insensitive)
    #[arg(short, long = "table")]
    tables: Vec<String>,

    /// Columns to include as table.column (repeatable; overrides --table)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// Maximum examples per field
    #[arg(short, long)]
    examples: Option<usize>,

    /// Keep type parameters such as VARCHAR(255)
    #[arg(long)]
    type_detail: bool,
}

impl FilterArgs {
    fn to_options(&self, settings: &Settings) -> RenderOptions {
        let mut options = settings.render.to_options();
        if !self.tables.is_empty() {
            options = options.with_tables(self.tables.iter().cloned());
        }
        if !self.columns.is_empty() {
            options = options.with_columns(self.columns.iter().cloned());
        }
        if let Some(cap) = self.examples {
            options = options.with_example_cap(cap);
        }
        if self.type_detail {
            options = options.with_type_detail(true);
        }
        options
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Render {
            database,
            db_id,
            namespace,
            save,
            refresh,
            filter,
        } => cmd_render(&settings, &database, db_id, namespace, save, refresh, &filter),
        Commands::Show { document, filter } => cmd_show(&settings, &document, &filter),
        Commands::Cache { action } => cmd_cache(&settings, action),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, mschema::config::SettingsError> {
    match path {
        Some(p) => Settings::from_file(p),
        None => Settings::load(),
    }
}

fn cmd_render(
    settings: &Settings,
    database: &Path,
    db_id: Option<String>,
    namespace: Option<String>,
    save: Option<PathBuf>,
    refresh: bool,
    filter: &FilterArgs,
) -> ExitCode {
    if !database.exists() {
        eprintln!("Database file not found: {}", database.display());
        return ExitCode::FAILURE;
    }

    let db_id = db_id
        .or_else(|| settings.introspect.db_id.clone())
        .or_else(|| database.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| mschema::model::ANONYMOUS_DB_ID.to_string());
    let namespace = namespace.or_else(|| settings.introspect.namespace.clone());
    let key = cache_key(database, &db_id, &namespace, settings.introspect.sample_limit);

    let cache = if settings.cache.enabled {
        open_cache(settings)
    } else {
        None
    };

    let cached = match (&cache, refresh) {
        (Some(cache), false) => cache.get(&key).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable cache entry");
            None
        }),
        _ => None,
    };

    let schema = match cached {
        Some(schema) => schema,
        None => {
            let introspector = match SqliteIntrospector::open(database) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Error opening '{}': {}", database.display(), e);
                    return ExitCode::FAILURE;
                }
            };
            let builder = SchemaBuilder::new(db_id)
                .with_namespace(namespace)
                .with_sample_limit(settings.introspect.sample_limit);
            let report = match builder.build(&introspector) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Introspection error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            for issue in &report.issues {
                tracing::info!(?issue, "introspection issue");
            }
            if let Some(cache) = &cache {
                if let Err(e) = cache.put(&key, &report.schema) {
                    tracing::warn!(error = %e, "failed to cache schema document");
                }
            }
            report.schema
        }
    };

    println!("{}", schema.render(&filter.to_options(settings)));

    if let Some(path) = save {
        if let Err(e) = save_document(&schema, &path) {
            eprintln!("Error writing '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        eprintln!("Saved M-Schema document to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn cmd_show(settings: &Settings, document: &Path, filter: &FilterArgs) -> ExitCode {
    let json = match fs::read_to_string(document) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", document.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match MSchema::from_json_str(&json) {
        Ok(schema) => {
            println!("{}", schema.render(&filter.to_options(settings)));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error loading '{}': {}", document.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_cache(settings: &Settings, action: CacheAction) -> ExitCode {
    let Some(cache) = open_cache(settings) else {
        return ExitCode::FAILURE;
    };

    let result = match action {
        CacheAction::Stats => cache.stats().map(|stats| {
            println!("Entries: {}", stats.entry_count);
            println!("Size:    {} bytes", stats.total_size_bytes);
        }),
        CacheAction::Clear => cache.clear_all().map(|_| println!("Cache cleared")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Cache error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_cache(settings: &Settings) -> Option<SchemaCache> {
    let opened = match settings.cache.resolved_path() {
        Ok(Some(path)) => SchemaCache::open(path),
        Ok(None) => SchemaCache::open_default(),
        Err(e) => {
            tracing::warn!(error = %e, "invalid cache path");
            return None;
        }
    };
    match opened {
        Ok(cache) => Some(cache),
        Err(e) => {
            tracing::warn!(error = %e, "schema cache unavailable");
            None
        }
    }
}

fn cache_key(database: &Path, db_id: &str, namespace: &Option<String>, sample_limit: usize) -> CacheKey {
    let source = fs::canonicalize(database).unwrap_or_else(|_| database.to_path_buf());
    let modified = fs::metadata(database)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    CacheKey {
        source: source.display().to_string(),
        modified,
        db_id: db_id.to_string(),
        namespace: namespace.clone(),
        sample_limit,
    }
}

fn save_document(schema: &MSchema, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, schema.to_json_pretty()?)?;
    Ok(())
}
