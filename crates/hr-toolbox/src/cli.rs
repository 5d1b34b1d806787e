use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use draw_engine::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "hr-toolbox")]
#[command(author, version, about = "Prize lottery and random team builder for HR events")]
pub struct Cli {
    /// TOML configuration file (overrides built-in defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub roster: RosterArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the participant list comes from.
#[derive(Args, Debug, Default, Clone)]
pub struct RosterArgs {
    /// Load the built-in 20-name sample list
    #[arg(long, default_value_t = false)]
    pub sample: bool,

    /// Text or CSV file of names (newline, comma or semicolon separated); repeatable
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Names given inline, e.g. "Ada, Grace; Linus"
    #[arg(long)]
    pub names: Option<String>,

    /// Collapse participants that share a name before running
    #[arg(long, default_value_t = false)]
    pub dedup: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the imported roster with duplicate markers
    Roster {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Draw prize winners
    Draw {
        /// Number of draws to run
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Prize label for each draw, in order; repeatable
        #[arg(long = "prize", value_name = "LABEL")]
        prizes: Vec<String>,

        /// Keep winners in the pool so they can win again
        #[arg(long, default_value_t = false)]
        allow_duplicate: bool,

        /// Skip the cycling reveal and commit each draw immediately
        #[arg(long, default_value_t = false)]
        no_reveal: bool,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Print the win history as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Split the roster into random groups
    Group {
        /// People per group (clamped to 2..=roster size)
        #[arg(long)]
        size: Option<usize>,

        /// Use "Team N" labels instead of asking for creative names
        #[arg(long, default_value_t = false)]
        no_ai: bool,

        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Write the export to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        /// Print the groups as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    Session {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}
