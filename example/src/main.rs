//! Example tabledef CLI.
//!
//! Loads the db config, lets the integrations extend it, resolves it and compares it with the
//! snapshot of the previous run, then writes the new snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use clap::Parser;
use tabledef::integration::{load_integration_configs, run_setup_hooks, seed_entrypoints};
use tabledef::prelude::*;
use tabledef::snapshot::TableDiff;
use tracing::{info, warn};

mod logger;

#[derive(Debug, Parser)]
#[command(name = "tabledef-example", version, about = "Resolve a db config and diff it")]
struct Args {
    /// Path to the db config (.toml or .json)
    #[arg(short, long, default_value = "db.config.toml")]
    config: PathBuf,
    /// Path to the snapshot of the previous run
    #[arg(short, long, default_value = "db.snapshot.json")]
    snapshot: PathBuf,
    /// Don't write the new snapshot
    #[arg(long)]
    dry_run: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Authors are defined in code; the other tables come from config files.
#[derive(Debug, Table)]
#[table(index(on = "email", unique))]
#[allow(dead_code)]
struct Author {
    #[column(primary_key)]
    id: u32,
    #[column(label = "Full name")]
    name: String,
    email: String,
    bio: Option<String>,
}

/// Integration adding the `Like` table, from a config file next to the user config.
struct LikesIntegration {
    root: PathBuf,
}

#[async_trait]
impl DbIntegration for LikesIntegration {
    fn name(&self) -> &str {
        "likes"
    }

    async fn db_setup(&self, ctx: &mut DbSetupContext) -> IntegrationResult<()> {
        ctx.extend_db(
            ExtendDbOptions::new()
                .config_entrypoint(self.root.join("likes.config.toml"))
                .seed_entrypoint(self.root.join("likes.seed.sql")),
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let base = DbConfigInput::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?
        .with_table::<Author>();

    let root = args
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let integrations: Vec<Arc<dyn DbIntegration>> = vec![Arc::new(LikesIntegration { root })];
    let extensions = run_setup_hooks(&integrations).await?;
    for seed in seed_entrypoints(&extensions) {
        info!(%seed, "seed file registered");
    }

    let config = load_integration_configs(base, &extensions)?.resolve()?;
    let current = DbSnapshot::current(&config);

    let previous = if args.snapshot.exists() {
        DbSnapshot::load(&args.snapshot)
            .with_context(|| format!("failed to load {}", args.snapshot.display()))?
    } else {
        warn!(
            path = %args.snapshot.display(),
            "no previous snapshot; diffing against an empty schema"
        );
        DbSnapshot::empty()
    };

    let diff = SnapshotDiff::between(&previous, &current)?;
    print_diff(&diff);

    if args.dry_run {
        info!("dry run; snapshot not written");
    } else {
        current
            .save(&args.snapshot)
            .with_context(|| format!("failed to write {}", args.snapshot.display()))?;
        info!(path = %args.snapshot.display(), "snapshot written");
    }

    Ok(())
}

fn print_diff(diff: &SnapshotDiff) {
    if diff.is_empty() {
        println!("schema is up to date");
        return;
    }

    for (name, table) in &diff.added_tables {
        println!("+ table {name} ({} columns)", table.columns.len());
    }
    for name in diff.dropped_tables.keys() {
        println!("- table {name}");
    }
    for (name, table) in &diff.changed_tables {
        println!("~ table {name}");
        print_table_diff(table);
    }
}

fn print_table_diff(table: &TableDiff) {
    for (name, column) in &table.added_columns {
        println!("    + column {name}: {}", column.column_type());
    }
    for name in table.dropped_columns.keys() {
        println!("    - column {name}");
    }
    for (name, change) in &table.updated_columns {
        let (old, new) = change.types();
        if change.type_changed() {
            println!("    ~ column {name}: {old} -> {new}");
        } else {
            println!("    ~ column {name}");
        }
    }
    for name in table.added_indexes.keys() {
        println!("    + index {name}");
    }
    for name in table.dropped_indexes.keys() {
        println!("    - index {name}");
    }
    if table.foreign_keys_changed {
        println!("    ~ foreign keys");
    }
    if table.deprecated_changed {
        println!("    ~ deprecated");
    }
}
