//! Opening a written rules file in the user's editor.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::RulesError;

/// Platform fallback when no editor is configured.
fn platform_opener() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["open".to_string()]
    } else if cfg!(windows) {
        vec!["cmd".to_string(), "/C".to_string(), "start".to_string(), String::new()]
    } else {
        vec!["xdg-open".to_string()]
    }
}

/// Pick the editor command: configured, then `$VISUAL`, then `$EDITOR`, then the platform opener.
/// The command string is split on whitespace so `code --wait` works.
pub fn editor_command(
    configured: Option<&str>,
    visual: Option<&str>,
    editor: Option<&str>,
) -> Vec<String> {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|cmd| !cmd.is_empty())
        .map(|cmd| cmd.split_whitespace().map(String::from).collect())
        .unwrap_or_else(platform_opener)
}

/// Open `path` and wait for the editor to exit.
pub fn open(path: &Path, configured: Option<&str>) -> Result<(), RulesError> {
    let visual = std::env::var("VISUAL").ok();
    let editor = std::env::var("EDITOR").ok();
    let command = editor_command(configured, visual.as_deref(), editor.as_deref());
    let command_line = command.join(" ");

    let Some((program, args)) = command.split_first() else {
        return Err(RulesError::Editor {
            command: command_line,
            path: path.to_path_buf(),
            message: "no editor command".to_string(),
        });
    };

    debug!(command = %command_line, path = ?path, "editor_launch");
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| {
            warn!(command = %command_line, error = %e, "editor_spawn_failed");
            RulesError::Editor {
                command: command_line.clone(),
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

    if !status.success() {
        warn!(command = %command_line, status = %status, "editor_exit_failed");
        return Err(RulesError::Editor {
            command: command_line,
            path: path.to_path_buf(),
            message: format!("exited with {}", status),
        });
    }

    info!(path = ?path, "editor_closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_editor_wins() {
        assert_eq!(
            editor_command(Some("code --wait"), Some("vim"), Some("nano")),
            vec!["code", "--wait"]
        );
    }

    #[test]
    fn test_visual_before_editor() {
        assert_eq!(editor_command(None, Some("vim"), Some("nano")), vec!["vim"]);
        assert_eq!(editor_command(None, None, Some("nano")), vec!["nano"]);
    }

    #[test]
    fn test_blank_values_are_skipped() {
        assert_eq!(editor_command(Some("  "), Some(""), Some("hx")), vec!["hx"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_open_runs_configured_command() {
        let path = Path::new("/tmp/ws/.cursor/rules/go-rules.mdc");
        assert!(open(path, Some("true")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_open_reports_failing_command() {
        let path = Path::new("/tmp/ws/.cursor/rules/go-rules.mdc");
        let err = open(path, Some("false --wait")).unwrap_err();
        match err {
            RulesError::Editor {
                command, message, ..
            } => {
                assert_eq!(command, "false --wait");
                assert!(message.starts_with("exited with"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_open_reports_missing_program() {
        let path = Path::new("/tmp/ws/.cursor/rules/go-rules.mdc");
        let err = open(path, Some("cursor-rules-no-such-editor")).unwrap_err();
        assert!(matches!(err, RulesError::Editor { .. }));
    }

    #[test]
    fn test_falls_back_to_platform_opener() {
        assert_eq!(editor_command(None, None, None), platform_opener());
    }
}
