//! Lineage CLI entry point

use clap::{Parser, Subcommand};
use lineage_core::LineageConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Word lineage graphs with deterministic topological ordering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project root holding lineage.toml and the snapshot (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/lineage.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a word and print its id
    Word {
        label: String,
    },
    /// Link a parent word to one or more children
    Link {
        parent: String,
        #[arg(required = true)]
        children: Vec<String>,
    },
    /// Remove the links between two words, in either direction
    Unlink {
        a: String,
        b: String,
    },
    /// Remove every link touching a word
    Isolate {
        word: String,
    },
    /// Create an empty family
    Family {
        name: String,
    },
    /// Rename a family
    Rename {
        family: String,
        name: String,
    },
    /// Add words to a family
    Add {
        family: String,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Remove words from a family, severing their links
    Remove {
        family: String,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Topologically sort a family
    Sort {
        family: String,
    },
    /// Print every family with its words and links
    Show,
    /// Delete the stored snapshot
    Clear,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LineageConfig::load(path)?,
        None => LineageConfig::discover(&cli.root)?,
    }
    .with_env_overrides();

    // Initialize logging
    let filter = if cli.verbose {
        "lineage=debug,lineage_core=debug".to_string()
    } else {
        config.log.filter.clone()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Lineage v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Project root: {}", cli.root.display());

    let root = cli.root;
    match cli.command {
        Commands::Word { label } => commands::word(&root, &config, label),
        Commands::Link { parent, children } => commands::link(&root, &config, &parent, &children),
        Commands::Unlink { a, b } => commands::unlink(&root, &config, &a, &b),
        Commands::Isolate { word } => commands::isolate(&root, &config, &word),
        Commands::Family { name } => commands::family(&root, &config, name),
        Commands::Rename { family, name } => commands::rename(&root, &config, &family, name),
        Commands::Add { family, words } => commands::add(&root, &config, &family, &words),
        Commands::Remove { family, words } => commands::remove(&root, &config, &family, &words),
        Commands::Sort { family } => commands::sort(&root, &config, &family),
        Commands::Show => commands::show(&root, &config),
        Commands::Clear => commands::clear(&root, &config),
        Commands::Version => {
            println!("Lineage v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
