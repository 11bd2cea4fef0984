//! Error type shared by every command.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a command. Cancelling a prompt is not one of them.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("No workspace is open: {} is not a directory", .path.display())]
    NoWorkspaceOpen { path: PathBuf },

    #[error("Template file not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Template file is empty: {name}")]
    TemplateEmpty { name: String },

    #[error("Failed to read template {name}: {source}")]
    TemplateRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Could not open {} with `{command}`: {message}", .path.display())]
    Editor {
        command: String,
        path: PathBuf,
        message: String,
    },

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_message_includes_path_and_cause() {
        let err = RulesError::WriteFailure {
            path: PathBuf::from("/tmp/ws/.cursor/rules/react-rules.mdc"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/ws/.cursor/rules/react-rules.mdc"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_template_errors_name_the_file() {
        let missing = RulesError::TemplateNotFound {
            name: "react.mdc".to_string(),
        };
        assert_eq!(missing.to_string(), "Template file not found: react.mdc");

        let empty = RulesError::TemplateEmpty {
            name: "vue.mdc".to_string(),
        };
        assert_eq!(empty.to_string(), "Template file is empty: vue.mdc");
    }

    #[test]
    fn test_io_error_converts_to_terminal() {
        let err: RulesError = std::io::Error::other("tty gone").into();
        assert!(matches!(err, RulesError::Terminal(_)));
    }
}
