//! Command-line interface for coursetrack.
//!
//! This module provides the CLI structure for the `ctrack` binary, which
//! plays the host page: it loads one page's sections, delivers a single
//! event and prints the resulting updates.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClearCommand, ConfigCommand, EmphasisArg, ExportCommand, FormatCommand, ImportCommand,
    KeyCommand, NoteCommand, PageArgs, SectionCommand, StatusCommand,
};

/// ctrack - Track your progress through a video course
///
/// Marks sections of a course page complete, keeps a note per section,
/// and exports or imports a page's saved state as a JSON backup.
#[derive(Debug, Parser)]
#[command(name = "ctrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Page selection
    #[command(flatten)]
    pub page: PageArgs,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mark a section complete
    Complete(SectionCommand),

    /// Clear a section's completion
    Unmark(SectionCommand),

    /// Replace a section's note
    Note(NoteCommand),

    /// Wrap part of a section's note in bold or italic
    Format(FormatCommand),

    /// Clear a section's note
    Clear(ClearCommand),

    /// Show the state of every section on the page
    Status(StatusCommand),

    /// Write the page's saved state to a backup file
    Export(ExportCommand),

    /// Restore saved state from a backup file
    Import(ImportCommand),

    /// Press a keyboard shortcut
    Key(KeyCommand),

    /// Show database statistics
    Stats(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Section the command acts on, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::Complete(cmd) | Self::Unmark(cmd) => Some(&cmd.section),
            Self::Note(cmd) => Some(&cmd.section),
            Self::Format(cmd) => Some(&cmd.section),
            Self::Clear(cmd) => Some(&cmd.section),
            _ => None,
        }
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            page: PageArgs::default(),
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "ctrack");
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(0, true).verbosity(), crate::logging::Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), crate::logging::Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), crate::logging::Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_complete_with_page() {
        let args = vec!["ctrack", "--page", "/week-1", "complete", "intro"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.page.page, "/week-1");
        assert_eq!(cli.command.section(), Some("intro"));
    }

    #[test]
    fn test_page_defaults() {
        let cli = Cli::try_parse_from(vec!["ctrack", "status"]).unwrap();
        assert_eq!(cli.page.page, "/");
        assert_eq!(cli.page.title, "");
        assert!(cli.command.section().is_none());
    }

    #[test]
    fn test_parse_repeated_sections_after_subcommand() {
        let args = vec!["ctrack", "status", "-s", "a", "--section", "b"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.page.sections, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_format() {
        let args = vec![
            "ctrack", "format", "intro", "--style", "italic", "--start", "2", "--end", "5",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Format(cmd) = cli.command else {
            panic!("expected format command");
        };
        assert_eq!(cmd.style, EmphasisArg::Italic);
        assert_eq!((cmd.start, cmd.end), (2, 5));
    }

    #[test]
    fn test_parse_clear_yes() {
        let cli = Cli::try_parse_from(vec!["ctrack", "clear", "intro", "-y"]).unwrap();
        assert!(matches!(cli.command, Command::Clear(ClearCommand { yes: true, .. })));
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(vec!["ctrack", "import", "backup.json"]).unwrap();
        assert!(matches!(cli.command, Command::Import(_)));
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(vec!["ctrack", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["ctrack", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(vec!["ctrack", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(vec!["ctrack", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}
