//! Writing resolved rules into the workspace.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use tracing::{debug, info, warn};

use crate::error::RulesError;
use crate::prompt::{Confirmation, Prompter};
use crate::templates::ResolvedContent;

/// Where rules files go inside a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RulesLayout {
    /// `.cursor/rules/<file>`
    #[default]
    Nested,
    /// A single `.cursorrules` file in the workspace root.
    Legacy,
}

impl RulesLayout {
    /// Directory that must exist before writing, if any.
    pub fn rules_dir(&self, workspace: &Path) -> Option<PathBuf> {
        match self {
            Self::Nested => Some(workspace.join(".cursor").join("rules")),
            Self::Legacy => None,
        }
    }

    pub fn target_path(&self, workspace: &Path, file_name: &str) -> PathBuf {
        match self {
            Self::Nested => workspace.join(".cursor").join("rules").join(file_name),
            Self::Legacy => workspace.join(".cursorrules"),
        }
    }
}

/// When to offer opening a freshly written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenBehavior {
    #[default]
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The file existed and the user chose not to overwrite it.
    Declined(PathBuf),
}

/// Short description of how `new` differs from `old`.
pub fn change_summary(old: &str, new: &str) -> String {
    if old == new {
        return "The existing file is identical to the template.".to_string();
    }

    let diff = TextDiff::from_lines(old, new);
    let (mut added, mut removed) = (0usize, 0usize);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    format!(
        "Overwriting changes {} line{}: +{} -{}",
        added + removed,
        if added + removed == 1 { "" } else { "s" },
        added,
        removed
    )
}

/// Write `resolved` into the workspace, asking before replacing an existing file.
pub fn write_rules(
    workspace: &Path,
    layout: RulesLayout,
    resolved: &ResolvedContent,
    prompter: &mut dyn Prompter,
) -> Result<WriteOutcome, RulesError> {
    if let Some(dir) = layout.rules_dir(workspace)
        && !dir.is_dir()
    {
        std::fs::create_dir_all(&dir).map_err(|source| RulesError::WriteFailure {
            path: dir.clone(),
            source,
        })?;
        info!(path = ?dir, "rules_dir_created");
    }

    let path = layout.target_path(workspace, &resolved.file_name);
    debug!(path = ?path, "rules_write_target");

    if path.exists() {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| resolved.file_name.clone());
        let detail = match std::fs::read_to_string(&path) {
            Ok(existing) => Some(change_summary(&existing, &resolved.content)),
            Err(e) => {
                warn!(path = ?path, error = %e, "existing_rules_unreadable");
                None
            }
        };

        let overwrite = prompter.confirm(&Confirmation {
            title: "File exists".to_string(),
            message: format!("{} already exists. Overwrite it?", display_name),
            detail,
            accept: "Overwrite".to_string(),
            reject: "Cancel".to_string(),
        })?;
        if !overwrite {
            info!(path = ?path, "overwrite_declined");
            return Ok(WriteOutcome::Declined(path));
        }
    }

    std::fs::write(&path, &resolved.content).map_err(|source| RulesError::WriteFailure {
        path: path.clone(),
        source,
    })?;
    info!(path = ?path, bytes = resolved.content.len(), "rules_written");

    Ok(WriteOutcome::Written(path))
}

/// Whether the written file should be opened, asking the user if configured to.
pub fn offer_open(
    path: &Path,
    behavior: OpenBehavior,
    prompter: &mut dyn Prompter,
) -> Result<bool, RulesError> {
    match behavior {
        OpenBehavior::Always => Ok(true),
        OpenBehavior::Never => Ok(false),
        OpenBehavior::Ask => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            prompter.confirm(&Confirmation {
                title: "Rules written".to_string(),
                message: format!("{} was created. Open it now?", name),
                detail: Some(path.display().to_string()),
                accept: "Open file".to_string(),
                reject: "Close".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::{Answer, ScriptedPrompter};
    use tempfile::TempDir;

    fn resolved(name: &str, content: &str) -> ResolvedContent {
        ResolvedContent {
            content: content.to_string(),
            file_name: name.to_string(),
        }
    }

    #[test]
    fn test_write_creates_nested_directories() {
        let ws = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::default();

        let outcome = write_rules(
            ws.path(),
            RulesLayout::Nested,
            &resolved("react-rules.mdc", "# React\n"),
            &mut prompter,
        )
        .unwrap();

        let expected = ws.path().join(".cursor/rules/react-rules.mdc");
        assert_eq!(outcome, WriteOutcome::Written(expected.clone()));
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "# React\n");
        assert!(prompter.confirmations.is_empty());
    }

    #[test]
    fn test_write_legacy_layout() {
        let ws = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::default();

        let outcome = write_rules(
            ws.path(),
            RulesLayout::Legacy,
            &resolved("react-rules.mdc", "# React\n"),
            &mut prompter,
        )
        .unwrap();

        assert_eq!(outcome, WriteOutcome::Written(ws.path().join(".cursorrules")));
        assert!(!ws.path().join(".cursor").exists());
    }

    #[test]
    fn test_declining_overwrite_keeps_existing_content() {
        let ws = TempDir::new().unwrap();
        let dir = ws.path().join(".cursor/rules");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("vue-rules.mdc"), "my edits\n").unwrap();

        let mut prompter = ScriptedPrompter::new([Answer::Confirm(false)]);
        let outcome = write_rules(
            ws.path(),
            RulesLayout::Nested,
            &resolved("vue-rules.mdc", "# Vue\n"),
            &mut prompter,
        )
        .unwrap();

        assert_eq!(outcome, WriteOutcome::Declined(dir.join("vue-rules.mdc")));
        assert_eq!(
            std::fs::read_to_string(dir.join("vue-rules.mdc")).unwrap(),
            "my edits\n"
        );
        assert_eq!(
            prompter.confirmations[0].message,
            "vue-rules.mdc already exists. Overwrite it?"
        );
    }

    #[test]
    fn test_accepting_overwrite_replaces_whole_file() {
        let ws = TempDir::new().unwrap();
        let dir = ws.path().join(".cursor/rules");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("vue-rules.mdc"), "a much longer old file\nline two\n").unwrap();

        let mut prompter = ScriptedPrompter::new([Answer::Confirm(true)]);
        write_rules(
            ws.path(),
            RulesLayout::Nested,
            &resolved("vue-rules.mdc", "# Vue\n"),
            &mut prompter,
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.join("vue-rules.mdc")).unwrap(),
            "# Vue\n"
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        let ws = TempDir::new().unwrap();
        // A plain file where the .cursor directory should go.
        std::fs::write(ws.path().join(".cursor"), "").unwrap();

        let mut prompter = ScriptedPrompter::default();
        let err = write_rules(
            ws.path(),
            RulesLayout::Nested,
            &resolved("go-rules.mdc", "# Go\n"),
            &mut prompter,
        )
        .unwrap_err();

        assert!(matches!(err, RulesError::WriteFailure { .. }));
    }

    #[test]
    fn test_change_summary() {
        assert_eq!(
            change_summary("a\nb\n", "a\nb\n"),
            "The existing file is identical to the template."
        );
        assert_eq!(
            change_summary("a\nb\n", "a\nc\n"),
            "Overwriting changes 2 lines: +1 -1"
        );
        assert_eq!(
            change_summary("a\n", "a\nb\n"),
            "Overwriting changes 1 line: +1 -0"
        );
    }

    #[test]
    fn test_offer_open_behaviors() {
        let path = Path::new("/ws/.cursor/rules/go-rules.mdc");
        let mut prompter = ScriptedPrompter::new([Answer::Confirm(true)]);

        assert!(offer_open(path, OpenBehavior::Always, &mut prompter).unwrap());
        assert!(!offer_open(path, OpenBehavior::Never, &mut prompter).unwrap());
        assert!(prompter.confirmations.is_empty());

        assert!(offer_open(path, OpenBehavior::Ask, &mut prompter).unwrap());
        assert_eq!(
            prompter.confirmations[0].message,
            "go-rules.mdc was created. Open it now?"
        );
    }
}
