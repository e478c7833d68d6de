//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::RenderStyle;

/// Inspect composite node trees: render, search and sort tree documents
#[derive(Parser, Debug)]
#[command(name = "dagnode")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .dagnode.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a tree document
    Show {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Rendering style (default from settings)
        #[arg(short, long, value_enum)]
        style: Option<RenderStyle>,
    },

    /// List descendants whose name matches a regex
    Find {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Regular expression searched in node names
        pattern: String,
        /// Ignore case
        #[arg(short, long, overrides_with = "no_ignore_case")]
        ignore_case: bool,
        /// Match case even when settings ignore it
        #[arg(long, overrides_with = "ignore_case")]
        no_ignore_case: bool,
    },

    /// List nodes (root included) whose family matches a regex
    Family {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Regular expression searched in node families
        pattern: String,
        /// Ignore case
        #[arg(short, long, overrides_with = "no_ignore_case")]
        ignore_case: bool,
        /// Match case even when settings ignore it
        #[arg(long, overrides_with = "ignore_case")]
        no_ignore_case: bool,
    },

    /// Sort a tree by name or attribute value and print it
    Sort {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Attribute whose value orders the children
        #[arg(short, long)]
        attribute: Option<String>,
        /// Descending order
        #[arg(short, long, overrides_with = "no_reverse")]
        reverse: bool,
        /// Ascending order even when settings reverse it
        #[arg(long, overrides_with = "reverse")]
        no_reverse: bool,
        /// Print the sorted tree as a JSON document
        #[arg(long)]
        json: bool,
    },

    /// Show the attributes of a node
    Attributes {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Exact node name
        name: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings
    Show,
    /// Print config file locations
    Path,
}
