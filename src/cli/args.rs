use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xctr")]
#[command(about = "Resumable DeepL translation for Xcode string catalogs")]
#[command(version)]
pub struct Args {
    /// Path to the .xcstrings catalog (searched for when not provided)
    pub catalog: Option<PathBuf>,

    /// Target language code as used in the catalog (e.g., de, fr, pt-BR)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Formality: default, more, less, prefer_more, prefer_less
    #[arg(short = 'f', long)]
    pub formality: Option<String>,

    /// Strings per API call (1-50)
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Use the DeepL Free API host
    #[arg(long)]
    pub free_api: bool,

    /// DeepL API key (overrides environment and config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Discard saved progress and start over
    #[arg(long)]
    pub fresh: bool,

    /// What to do when a batch fails
    #[arg(long, value_enum, default_value_t = OnError::Ask)]
    pub on_error: OnError,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-batch diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show translation progress of every language in a catalog
    Status {
        /// Path to the .xcstrings catalog (searched for when not provided)
        catalog: Option<PathBuf>,
    },
    /// List languages DeepL can translate catalogs into
    Languages,
    /// Configure xctr settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Policy for failed batches.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    /// Ask interactively (skips when not attached to a terminal)
    Ask,
    /// Skip the batch and continue
    Skip,
    /// Retry the batch, up to the retry limit
    Retry,
    /// Stop the run
    Abort,
}
