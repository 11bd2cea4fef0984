//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::ListFormat;
use crate::writer::RulesLayout;

/// Add Cursor AI rules and role templates to a project
#[derive(Debug, Parser)]
#[command(
    name = "cursor-rules",
    version,
    about = "Pick a rule or role template and write it into a project's Cursor rules",
    after_help = "Configuration: config.toml in the platform config directory, overridden by .cursor-rules.toml in the workspace"
)]
pub struct Cli {
    /// Project directory to write rules into (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Read templates from this directory instead of the built-in set
    #[arg(long, global = true, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Where rules are written
    #[arg(long, global = true, value_enum)]
    pub layout: Option<RulesLayout>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose a role or project template and write it
    Add,

    /// Show every available template and role
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ListFormat::Markdown)]
        format: ListFormat,

        /// Print to stdout even when attached to a terminal
        #[arg(long)]
        print: bool,
    },

    /// Choose from the general templates
    AddGeneral,

    /// Choose from the web front-end templates
    AddWeb,

    /// Choose from the mobile app templates
    AddMobile,

    /// Choose from the back-end service templates
    AddBackend,
}

impl Command {
    /// Category key for the shortcut commands.
    pub fn category_key(&self) -> Option<&'static str> {
        match self {
            Self::AddGeneral => Some("general"),
            Self::AddWeb => Some("web"),
            Self::AddMobile => Some("mobile"),
            Self::AddBackend => Some("backend"),
            Self::Add | Self::List { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_category;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shortcut_keys_exist_in_catalog() {
        for command in [
            Command::AddGeneral,
            Command::AddWeb,
            Command::AddMobile,
            Command::AddBackend,
        ] {
            let key = command.category_key().unwrap();
            assert!(find_category(key).is_some(), "{}", key);
        }
        assert!(Command::Add.category_key().is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cursor-rules",
            "add-web",
            "--workspace",
            "/tmp/project",
            "--layout",
            "legacy",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::AddWeb));
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.layout, Some(RulesLayout::Legacy));
    }

    #[test]
    fn test_list_options() {
        let cli = Cli::try_parse_from(["cursor-rules", "list", "--format", "json"]).unwrap();
        match cli.command {
            Command::List { format, print } => {
                assert_eq!(format, ListFormat::Json);
                assert!(!print);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
