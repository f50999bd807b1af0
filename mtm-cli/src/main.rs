mod init;
mod populate;
mod pull;
mod push;
mod report;
mod resolve;
mod save;
mod status;

use clap::{Parser, Subcommand};
use mtm::Project;
use tracing_subscriber::EnvFilter;

use crate::{
    init::run_init_command, populate::run_populate_command, pull::run_pull_command,
    push::run_push_command, resolve::run_resolve_command, save::run_save_command,
    status::run_status_command,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project configuration file (JSON, or TOML when it ends in `.toml`)
    #[arg(short, long, global = true, default_value = mtm::config::DEFAULT_CONFIG_FILENAME)]
    config: String,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the string index from the project's resource files.
    Init {
        /// Overwrite an existing index
        #[arg(long)]
        force: bool,
    },

    /// Show translation progress and unresolved conflicts.
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick the translation of one entry, settling a conflict.
    Resolve {
        /// Canonical value of the entry, or one of its resource keys
        #[arg(short, long)]
        key: String,
        /// Language of the translation (`fr`, `pt-rBR`, `pt-BR`, `pt_BR`)
        #[arg(short, long)]
        lang: String,
        /// The chosen translation; empty resets it to the canonical value
        #[arg(short, long, allow_hyphen_values = true)]
        value: String,
    },

    /// Apply translations from a sheet exported as CSV.
    Pull {
        #[arg(short, long)]
        input: String,
    },

    /// Export the index as a CSV sheet for translators.
    Push {
        #[arg(short, long)]
        output: String,
        /// Languages to export, repeatable or comma separated (default: all but the defaults)
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,
    },

    /// Write the index back into the translated resource files.
    Save,

    /// Copy keys missing from translated files out of their default files.
    Populate,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    tracing::debug!(config = %args.config, "Opening project");
    let project = Project::open(&args.config)
        .map_err(|e| format!("Failed to load config {}: {}", args.config, e))?;

    match args.commands {
        Commands::Init { force } => run_init_command(&project, force),
        Commands::Status { json } => run_status_command(&project, json),
        Commands::Resolve { key, lang, value } => run_resolve_command(&project, &key, &lang, &value),
        Commands::Pull { input } => run_pull_command(&project, &input),
        Commands::Push { output, lang } => run_push_command(&project, &output, &lang),
        Commands::Save => run_save_command(&project),
        Commands::Populate => run_populate_command(&project),
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
