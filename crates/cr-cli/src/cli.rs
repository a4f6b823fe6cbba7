use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cr")]
#[command(about = "Content rating classification and redaction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "CR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Rating database, overrides the config
    #[arg(long, global = true, env = "CR_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize rating text to its canonical code
    Classify {
        /// Free-text rating, e.g. "R-18"
        text: String,
    },

    /// Manage stored ratings
    #[command(subcommand)]
    Rating(RatingCommands),

    /// Print marker text
    #[command(subcommand)]
    Markers(MarkerCommands),

    /// Redact a rendered document for a viewer
    Redact {
        /// Input file, or "-" for stdin
        input: String,

        /// Rating codes the viewer has opted in to (repeatable)
        #[arg(long)]
        allow: Vec<String>,

        /// Render for an anonymous or blocked viewer
        #[arg(long)]
        anonymous: bool,

        /// Print the per-code report to stderr
        #[arg(long)]
        report: bool,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum RatingCommands {
    /// Show a unit's rating
    Get {
        /// Content unit id
        unit: i64,
    },

    /// Rate a unit (unknown text clears it, like the directive)
    Set {
        /// Content unit id
        unit: i64,

        /// Rating text, e.g. "R18" or "r 15"
        text: String,
    },

    /// Remove a unit's rating
    Clear {
        /// Content unit id
        unit: i64,
    },

    /// List all rated units
    List,
}

#[derive(Subcommand)]
pub enum MarkerCommands {
    /// Boundary markers for a region tag
    Block {
        /// Rating that starts here
        #[arg(long)]
        start: Option<String>,

        /// Rating that ends here
        #[arg(long)]
        end: Option<String>,
    },

    /// Prefix and suffix for a unit's media embed
    Inline {
        /// Content unit id
        unit: i64,
    },
}
