//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Which page the command acts on.
#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    /// Path of the course page, used to namespace stored keys
    #[arg(short, long, global = true, default_value = "/", value_name = "PATH")]
    pub page: String,

    /// Document title of the page, used to name backups
    #[arg(short, long, global = true, default_value = "", value_name = "TITLE")]
    pub title: String,

    /// Section present on the page (repeatable); stored sections are added
    #[arg(short, long = "section", global = true, value_name = "ID")]
    pub sections: Vec<String>,
}

/// A command acting on one section.
#[derive(Debug, Args)]
pub struct SectionCommand {
    /// Section id
    pub section: String,
}

/// Note command arguments.
#[derive(Debug, Args)]
pub struct NoteCommand {
    /// Section id
    pub section: String,

    /// New note text; `\n` sequences become line breaks
    pub text: String,
}

/// Format command arguments.
#[derive(Debug, Args)]
pub struct FormatCommand {
    /// Section id
    pub section: String,

    /// Emphasis to apply
    #[arg(long, value_enum, default_value = "bold")]
    pub style: EmphasisArg,

    /// First selected character
    #[arg(long)]
    pub start: usize,

    /// One past the last selected character
    #[arg(long)]
    pub end: usize,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Section id
    pub section: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Directory to write the backup to (defaults to the configured one)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Backup file to import
    pub file: PathBuf,
}

/// Key command arguments.
#[derive(Debug, Args)]
pub struct KeyCommand {
    /// Key combo, e.g. `ctrl+s` or `meta+ArrowRight`
    pub combo: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Emphasis argument for the format command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmphasisArg {
    /// Wrap in `**`
    Bold,
    /// Wrap in `*`
    Italic,
}
