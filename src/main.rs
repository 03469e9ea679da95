//! volconf CLI - renders deployment artifacts from manifest properties

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use volconf::error::{ConfigError, FixSuggestion};
use volconf::links::Links;
use volconf::properties::PropertyTree;
use volconf::{app_manifest, ca_cert, db_config, start_flags};

#[derive(Parser)]
#[command(name = "volconf")]
#[command(about = "Renders deployment artifacts for the volume services broker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the database connection descriptor (config.json)
    DbConfig {
        /// Path to the job's properties YAML
        #[arg(long)]
        properties: PathBuf,

        /// Write the artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the broker start script (start.sh)
    StartFlags {
        /// Path to the job's properties YAML
        #[arg(long)]
        properties: PathBuf,

        /// Path to the bound links YAML
        #[arg(long)]
        links: Option<PathBuf>,

        /// Which optional-flag contract to render
        #[arg(long, value_enum, default_value = "server")]
        variant: FlagVariant,

        /// Write the artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the CA certificate file (db_ca.crt)
    CaCert {
        /// Path to the job's properties YAML
        #[arg(long)]
        properties: PathBuf,

        /// Property holding the certificate
        #[arg(long, default_value = "db.ca_cert")]
        key: String,

        /// Write the artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the application push manifest (manifest.yml)
    AppManifest {
        /// Path to the job's properties YAML
        #[arg(long)]
        properties: PathBuf,

        /// Path to the bound links YAML
        #[arg(long)]
        links: Option<PathBuf>,

        /// Write the artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FlagVariant {
    Server,
    Push,
}

impl From<FlagVariant> for start_flags::Variant {
    fn from(variant: FlagVariant) -> Self {
        match variant {
            FlagVariant::Server => start_flags::Variant::Server,
            FlagVariant::Push => start_flags::Variant::Push,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), ConfigError> {
    match command {
        Commands::DbConfig { properties, output } => {
            let properties = load_properties(&properties)?;
            emit(db_config::render(&properties)?, output)
        }
        Commands::StartFlags {
            properties,
            links,
            variant,
            output,
        } => {
            let properties = load_properties(&properties)?;
            let links = load_links(links.as_deref())?;
            emit(
                start_flags::render(&properties, &links, variant.into())?,
                output,
            )
        }
        Commands::CaCert {
            properties,
            key,
            output,
        } => {
            let properties = load_properties(&properties)?;
            emit(ca_cert::render(&properties, &key), output)
        }
        Commands::AppManifest {
            properties,
            links,
            output,
        } => {
            let properties = load_properties(&properties)?;
            let links = load_links(links.as_deref())?;
            emit(app_manifest::render(&properties, &links)?, output)
        }
    }
}

fn load_properties(path: &Path) -> Result<PropertyTree, ConfigError> {
    let yaml = fs::read_to_string(path)?;
    PropertyTree::from_yaml(&yaml)
}

fn load_links(path: Option<&Path>) -> Result<Links, ConfigError> {
    match path {
        Some(path) => {
            let yaml = fs::read_to_string(path)?;
            Links::from_yaml(&yaml)
        }
        None => Ok(Links::default()),
    }
}

fn emit(artifact: String, output: Option<PathBuf>) -> Result<(), ConfigError> {
    match output {
        Some(path) => {
            fs::write(&path, &artifact)?;
            println!("{} wrote {}", "✓".green(), path.display());
        }
        None => print!("{artifact}"),
    }
    Ok(())
}
