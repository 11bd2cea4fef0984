use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::writer::{OpenBehavior, RulesLayout};

/// File name of the per-project override, looked up in the workspace root.
pub const PROJECT_CONFIG_FILE: &str = ".cursor-rules.toml";

/// Status of config file loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    Error(String),
}

/// Template store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of `.mdc` templates. Unset means the templates built into the binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub layout: RulesLayout,
    pub open_after_write: OpenBehavior,
    /// Editor command; falls back to `$VISUAL`, `$EDITOR`, then the platform opener.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Expand `~` to home directory in a path string
    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(path)
    }

    /// Expanded template directory, if one is configured.
    pub fn templates_path(&self) -> Option<PathBuf> {
        self.paths
            .templates
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(Self::expand_tilde)
    }
}

/// Partial path configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialPathsConfig {
    pub templates: Option<String>,
}

/// Partial logging configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialLoggingConfig {
    pub level: Option<String>,
}

/// Partial output configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialOutputConfig {
    pub layout: Option<RulesLayout>,
    pub open_after_write: Option<OpenBehavior>,
    pub editor: Option<String>,
}

/// Project-specific configuration where every field is optional.
/// Parsed from `.cursor-rules.toml`. Fields that are `None` inherit from the global config.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialConfig {
    pub paths: PartialPathsConfig,
    pub logging: PartialLoggingConfig,
    pub output: PartialOutputConfig,
}

/// Merge a global config with a project-level partial config.
/// Project values override global values where present.
pub fn merge_config(global: &Config, project: &PartialConfig) -> Config {
    Config {
        paths: PathsConfig {
            templates: project
                .paths
                .templates
                .clone()
                .or_else(|| global.paths.templates.clone()),
        },
        logging: LoggingConfig {
            level: project
                .logging
                .level
                .clone()
                .unwrap_or_else(|| global.logging.level.clone()),
        },
        output: OutputConfig {
            layout: project.output.layout.unwrap_or(global.output.layout),
            open_after_write: project
                .output
                .open_after_write
                .unwrap_or(global.output.open_after_write),
            editor: project
                .output
                .editor
                .clone()
                .or_else(|| global.output.editor.clone()),
        },
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub project_config_path: Option<PathBuf>,
    pub status: ConfigLoadStatus,
    /// Problem with the project override, if it could not be used.
    pub project_error: Option<String>,
    /// Environment overrides that were ignored, and why.
    pub override_warnings: Vec<String>,
}

/// Get the platform-appropriate config directory
fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "cursor-rules", "cursor-rules")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path inside `workspace`, if the file exists.
pub fn get_project_config_path(workspace: &Path) -> Option<PathBuf> {
    let path = workspace.join(PROJECT_CONFIG_FILE);
    if path.is_file() { Some(path) } else { None }
}

/// Load a project config from the given path.
fn load_project_config(path: &Path) -> Result<PartialConfig, String> {
    let contents = fs::read_to_string(path).map_err(|e| {
        warn!(path = ?path, error = %e, "project_config_read_failed");
        format!("Failed to read {}: {}", PROJECT_CONFIG_FILE, e)
    })?;

    toml::from_str::<PartialConfig>(&contents).map_err(|e| {
        warn!(path = ?path, error = %e, "project_config_parse_failed");
        format!("Invalid {}: {}", PROJECT_CONFIG_FILE, e)
    })
}

/// Load configuration from the global file, the workspace override, and the environment
pub fn load_config(workspace: Option<&Path>) -> LoadedConfig {
    let (config, config_path, status) = match get_config_path() {
        Some(path) => {
            debug!("Config path: {:?}", path);
            let (config, status) = load_or_create_config(&path);
            (config, path, status)
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            (
                Config::default(),
                PathBuf::from("config.toml"),
                ConfigLoadStatus::Error("Could not determine config directory".to_string()),
            )
        }
    };

    let project_config_path = workspace.and_then(get_project_config_path);
    let (config, project_error) = apply_project_config(config, project_config_path.as_deref());

    let (config, override_warnings) = apply_env_overrides(config);

    LoadedConfig {
        config,
        config_path,
        project_config_path,
        status,
        project_error,
        override_warnings,
    }
}

/// Merge the project override, if any, keeping the global config when it is unusable.
fn apply_project_config(config: Config, project_path: Option<&Path>) -> (Config, Option<String>) {
    let Some(project_path) = project_path else {
        return (config, None);
    };

    match load_project_config(project_path) {
        Ok(partial) => {
            info!(path = ?project_path, "project_config_loaded");
            (merge_config(&config, &partial), None)
        }
        Err(e) => (config, Some(e)),
    }
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                info!("Loaded config from {:?}", config_path);
                (config, ConfigLoadStatus::Loaded)
            }
            Err(e) => {
                warn!(
                    "Config file malformed at {:?}: {}. Using defaults.",
                    config_path, e
                );
                (
                    Config::default(),
                    ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
                )
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_default_config(config_path),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "Permission denied reading config at {:?}. Using defaults.",
                config_path
            );
            (
                Config::default(),
                ConfigLoadStatus::Error("Permission denied reading config".to_string()),
            )
        }
        Err(e) => {
            warn!(
                "Error reading config at {:?}: {}. Using defaults.",
                config_path, e
            );
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Create the default config file
fn create_default_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    let config = Config::default();

    if let Some(parent) = config_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!(
            "Could not create config directory {:?}: {}. Continuing without file.",
            parent, e
        );
        return (
            config,
            ConfigLoadStatus::Error(format!("Could not create config directory: {}", e)),
        );
    }

    let toml_content = match toml::to_string_pretty(&config) {
        Ok(s) => s,
        Err(e) => {
            warn!("Could not serialize default config: {}", e);
            return (
                config,
                ConfigLoadStatus::Error(format!("Serialization error: {}", e)),
            );
        }
    };

    match fs::write(config_path, &toml_content) {
        Ok(()) => {
            info!("Created default config at {:?}", config_path);
            (config, ConfigLoadStatus::Created)
        }
        Err(e) => {
            warn!(
                "Could not write default config to {:?}: {}. Continuing without file.",
                config_path, e
            );
            (
                config,
                ConfigLoadStatus::Error(format!("Write error: {}", e)),
            )
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(config: Config) -> (Config, Vec<String>) {
    apply_overrides(config, |key| env::var(key).ok())
}

/// Returns the overridden config and a message for every value that was ignored.
fn apply_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(dir) = var("CURSOR_RULES_TEMPLATES_DIR") {
        debug!("Overriding paths.templates from CURSOR_RULES_TEMPLATES_DIR");
        config.paths.templates = Some(dir);
    }

    if let Some(layout) = var("CURSOR_RULES_LAYOUT") {
        match layout.trim().to_lowercase().as_str() {
            "nested" => config.output.layout = RulesLayout::Nested,
            "legacy" => config.output.layout = RulesLayout::Legacy,
            other => {
                warn!(value = %other, "Ignoring unknown CURSOR_RULES_LAYOUT");
                warnings.push(format!(
                    "Ignoring CURSOR_RULES_LAYOUT={:?}: expected \"nested\" or \"legacy\"",
                    layout
                ));
            }
        }
    }

    if let Some(level) = var("CURSOR_RULES_LOG") {
        debug!("Overriding logging.level from CURSOR_RULES_LOG");
        config.logging.level = level;
    }

    if let Some(editor) = var("CURSOR_RULES_EDITOR") {
        debug!("Overriding output.editor from CURSOR_RULES_EDITOR");
        config.output.editor = Some(editor);
    }

    (config, warnings)
}
