use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Collect quotes and keep them in sync with a remote feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a quote and push it to the server
    #[command(alias = "new")]
    Add {
        /// Quote text
        #[arg(required = true)]
        text: Vec<String>,
        /// Category label
        #[arg(short, long)]
        category: String,
    },
    /// List quotes
    List {
        /// Category to show (defaults to the saved filter; "all" for everything)
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a random quote
    Random {
        /// Category to draw from (defaults to the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories
    Categories,
    /// Save the category filter used by list and random
    Filter {
        /// Category name, or "all"
        category: String,
    },
    /// Import quotes from a JSON file
    Import {
        /// Path to a JSON array of quotes
        path: PathBuf,
    },
    /// Export all quotes as JSON
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH", conflicts_with = "auto_name")]
        output: Option<PathBuf>,
        /// Write to a timestamped file in the current directory
        #[arg(long)]
        auto_name: bool,
    },
    /// Run one sync cycle against the server
    Sync {
        /// Which side to keep when conflicts are found (server wins by default)
        #[arg(long, value_enum)]
        resolve: Option<ConflictChoice>,
    },
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between cycles (defaults to the configured interval)
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure sync settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ConflictChoice {
    /// Keep the server version
    Remote,
    /// Restore your local version
    Local,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the config file
    Init {
        /// Remote feed endpoint
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Maximum quotes fetched per cycle
        #[arg(long, value_name = "N")]
        fetch_limit: Option<usize>,
        /// Seconds between periodic sync cycles
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// HTTP request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Print the effective settings
    Show,
}
