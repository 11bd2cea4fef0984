mod catalog;
mod cli;
mod commands;
mod config;
mod editor;
mod error;
mod flow;
mod logging;
mod modal_ui;
mod modals;
mod prompt;
mod render;
mod templates;
mod terminal;
mod writer;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info, warn};

use crate::cli::{Cli, Command};
use crate::commands::{CommandContext, CommandOutcome, ListFormat};
use crate::config::{Config, ConfigLoadStatus};
use crate::error::RulesError;
use crate::templates::{DirectoryTemplates, EmbeddedTemplates, TemplateStore};
use crate::terminal::TerminalPrompter;

/// Contract a path by replacing the home directory with `~` for display.
fn contract_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(suffix) = path.strip_prefix(&home)
    {
        return format!("~/{}", suffix.display());
    }
    path.display().to_string()
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    // Initialize logging before anything else
    let logging = match logging::init() {
        Ok(ctx) => {
            logging::cleanup_old_logs(&ctx.log_directory);
            Some(ctx)
        }
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    let workspace = commands::workspace_root(cli.workspace.as_deref());
    let loaded_config = config::load_config(workspace.as_deref().ok());

    if let Some(ctx) = &logging
        && let Err(e) = ctx.apply_level(&loaded_config.config.logging.level)
    {
        eprintln!("Warning: {}, keeping the default log level", e);
    }

    debug!(
        config_path = %loaded_config.config_path.display(),
        project_config = ?loaded_config.project_config_path,
        status = ?loaded_config.status,
        "config_loaded"
    );
    if let ConfigLoadStatus::Error(message) = &loaded_config.status {
        eprintln!(
            "Warning: {} ({}), using defaults",
            message,
            contract_path(&loaded_config.config_path)
        );
    }
    if let Some(message) = &loaded_config.project_error {
        warn!(error = %message, "project_config_ignored");
        eprintln!("Warning: {}, project settings ignored", message);
    }
    for message in &loaded_config.override_warnings {
        eprintln!("Warning: {}", message);
    }

    let result = run(&cli, workspace, loaded_config.config);

    if let Err(e) = &result {
        error!(error = %e, "command_failed");
    }
    if let Some(ctx) = &logging {
        info!(
            session_id = %ctx.session_id,
            duration_secs = start_time.elapsed().as_secs_f64(),
            "session_end"
        );
    }
    // Flush the log before a possible exit, which skips destructors.
    drop(logging);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(
    cli: &Cli,
    workspace: Result<PathBuf, RulesError>,
    mut config: Config,
) -> Result<(), RulesError> {
    if let Some(layout) = cli.layout {
        config.output.layout = layout;
    }
    let templates_dir = cli.templates.clone().or_else(|| config.templates_path());

    let directory_store;
    let store: &dyn TemplateStore = match templates_dir {
        Some(dir) => {
            debug!(path = ?dir, "using_template_directory");
            directory_store = DirectoryTemplates::new(dir);
            &directory_store
        }
        None => &EmbeddedTemplates,
    };

    match &cli.command {
        Command::List { format, print } => list(*format, *print),
        command => {
            let ctx = CommandContext {
                workspace: workspace?,
                store,
                layout: config.output.layout,
                open_behavior: config.output.open_after_write,
            };
            info!(
                command = ?command,
                workspace = ?ctx.workspace,
                templates = %store.location(),
                "command_start"
            );
            add(&ctx, command.category_key(), config.output.editor.as_deref())
        }
    }
}

fn list(format: ListFormat, print: bool) -> Result<(), RulesError> {
    let document = commands::list_rules(format)?;
    if format == ListFormat::Markdown && !print && io::stdout().is_terminal() {
        let mut prompter = TerminalPrompter::new();
        prompter.show_document("Cursor rules overview", &document)?;
    } else {
        println!("{}", document.trim_end());
    }
    Ok(())
}

fn add(
    ctx: &CommandContext<'_>,
    category: Option<&str>,
    editor_command: Option<&str>,
) -> Result<(), RulesError> {
    let outcome = {
        // Dropped at the end of this block so the screen is restored before printing.
        let mut prompter = TerminalPrompter::new();
        match category {
            Some(key) => commands::add_category_rules(ctx, key, &mut prompter)?,
            None => commands::add_rules(ctx, &mut prompter)?,
        }
    };

    match outcome {
        CommandOutcome::Written { path, open } => {
            println!("Rules written to {}", contract_path(&path));
            if open {
                editor::open(&path, editor_command)?;
            }
        }
        CommandOutcome::Declined(path) => {
            println!("Kept existing {}", contract_path(&path));
        }
        CommandOutcome::Cancelled => {
            println!("Cancelled, nothing was written.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_path_outside_home() {
        assert_eq!(contract_path(Path::new("/tmp/project")), "/tmp/project");
    }

    #[test]
    fn test_contract_path_inside_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(contract_path(&home.join("code/app")), "~/code/app");
        }
    }
}
