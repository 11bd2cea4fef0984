//! Command handlers shared by every subcommand.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::catalog;
use crate::error::RulesError;
use crate::flow::{self, FlowOutcome, FlowState, Selection};
use crate::prompt::Prompter;
use crate::render::{catalog_json, render_role, rules_overview};
use crate::templates::{ResolvedContent, TemplateStore, resolve};
use crate::writer::{OpenBehavior, RulesLayout, WriteOutcome, offer_open, write_rules};

/// Output format of `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListFormat {
    #[default]
    Markdown,
    Json,
}

/// Everything a writing command needs besides the prompter.
pub struct CommandContext<'a> {
    pub workspace: PathBuf,
    pub store: &'a dyn TemplateStore,
    pub layout: RulesLayout,
    pub open_behavior: OpenBehavior,
}

/// How a writing command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The file was written; `open` is whether the user wants it opened.
    Written { path: PathBuf, open: bool },
    /// The target existed and the user kept it.
    Declined(PathBuf),
    /// A menu was dismissed before anything was chosen.
    Cancelled,
}

/// The workspace directory: `requested` or the current directory.
pub fn workspace_root(requested: Option<&Path>) -> Result<PathBuf, RulesError> {
    let path = match requested {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().map_err(|e| {
            warn!(error = %e, "current_dir_unavailable");
            RulesError::NoWorkspaceOpen {
                path: PathBuf::from("."),
            }
        })?,
    };

    if !path.is_dir() {
        return Err(RulesError::NoWorkspaceOpen { path });
    }
    Ok(path)
}

/// Content and file name for whatever the flow resolved to.
pub fn resolve_selection(
    selection: Selection,
    store: &dyn TemplateStore,
) -> Result<ResolvedContent, RulesError> {
    match selection {
        Selection::Template(template) => resolve(store, template.file_name),
        Selection::Role(role) => render_role(role, store),
    }
}

/// `add`: the full flow starting from the rule type menu.
pub fn add_rules(
    ctx: &CommandContext<'_>,
    prompter: &mut dyn Prompter,
) -> Result<CommandOutcome, RulesError> {
    run_and_write(ctx, FlowState::ChooseRuleType, prompter)
}

/// `add-<category>`: straight into one category's templates.
pub fn add_category_rules(
    ctx: &CommandContext<'_>,
    category_key: &str,
    prompter: &mut dyn Prompter,
) -> Result<CommandOutcome, RulesError> {
    let category = catalog::find_category(category_key)
        .ok_or_else(|| RulesError::UnknownCategory(category_key.to_string()))?;
    run_and_write(ctx, FlowState::category_shortcut(category), prompter)
}

fn run_and_write(
    ctx: &CommandContext<'_>,
    start: FlowState,
    prompter: &mut dyn Prompter,
) -> Result<CommandOutcome, RulesError> {
    let selection = match flow::run(start, prompter)? {
        FlowOutcome::Resolved(selection) => selection,
        FlowOutcome::Cancelled => return Ok(CommandOutcome::Cancelled),
    };

    let resolved = resolve_selection(selection, ctx.store)?;
    match write_rules(&ctx.workspace, ctx.layout, &resolved, prompter)? {
        WriteOutcome::Declined(path) => Ok(CommandOutcome::Declined(path)),
        WriteOutcome::Written(path) => {
            let open = offer_open(&path, ctx.open_behavior, prompter)?;
            info!(path = ?path, open, "command_completed");
            Ok(CommandOutcome::Written { path, open })
        }
    }
}

/// `list`: the overview document in the requested format.
pub fn list_rules(format: ListFormat) -> Result<String, RulesError> {
    match format {
        ListFormat::Markdown => Ok(rules_overview()),
        ListFormat::Json => catalog_json(),
    }
}
