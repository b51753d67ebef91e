//! CLI entry point for `pg2ent`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use pg2ent::config::Config;
use pg2ent::generator::schema_generator::SchemaGenerator;
use pg2ent::output::formatter;
use pg2ent::parser::ddl_walker;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUT_DIR: &str = "ent/schema";

#[derive(Parser)]
#[command(
    name = "pg2ent",
    about = "Generate ent schema files from a PostgreSQL parse tree"
)]
struct Cli {
    /// pg_query JSON parse tree (defaults to `parse-tree` in the config)
    input: Option<PathBuf>,

    /// YAML generation config
    #[arg(long, default_value = "pg2ent.yaml")]
    config: PathBuf,

    /// Output directory (defaults to `out-dir` in the config, then `ent/schema`)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Stage 1: Load config
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(2);
        }
    };

    let Some(tree_path) = cli.input.clone().or_else(|| config.parse_tree.clone()) else {
        eprintln!("No parse tree provided: pass a path or set `parse-tree` in the config");
        process::exit(2);
    };
    let out_dir = cli
        .out_dir
        .clone()
        .or_else(|| config.out_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    // Stage 2: Walk the parse tree
    let tree = match std::fs::read_to_string(&tree_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {e}", tree_path.display());
            process::exit(2);
        }
    };
    let tables = match ddl_walker::parse_tree_json(&tree) {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Parse tree error: {e}");
            process::exit(2);
        }
    };

    if cli.verbose {
        eprintln!("Parsed {} tables", tables.len());
    }

    // Stage 3: Generate, one table at a time
    let generator = SchemaGenerator::new(&config);
    let mut files = Vec::with_capacity(tables.len());
    let mut failed = 0usize;
    for (table, result) in tables.iter().zip(generator.generate_all(&tables)) {
        match result {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!(table = %table.name, error = %e, "table generation failed");
                eprintln!("Error generating table '{}': {e}", table.name);
                failed += 1;
            }
        }
    }

    // Stage 4: Write output
    let written = match formatter::write_schema_files(&out_dir, &files) {
        Ok(written) => written,
        Err(e) => {
            eprintln!("Error writing output: {e}");
            process::exit(2);
        }
    };
    if cli.verbose {
        for path in &written {
            eprintln!("Wrote {}", path.display());
        }
    }

    // Stage 5: Optional gofmt pass
    if config.format {
        if let Err(e) = formatter::format_files(&written) {
            eprintln!("Error formatting output: {e}");
            process::exit(2);
        }
    }

    if failed > 0 {
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
