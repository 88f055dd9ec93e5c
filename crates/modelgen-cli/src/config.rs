//! Configuration discovery for the CLI.
//!
//! A configuration file is taken from `--config` when given; otherwise the
//! first existing file among the project-local and platform candidates is
//! used. Without any file the defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use modelgen::{ModelgenError, config::AppConfig};

const LOCAL_CONFIG: &str = "modelgen/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid configuration in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl From<ConfigError> for ModelgenError {
    fn from(err: ConfigError) -> Self {
        ModelgenError::Io(io::Error::other(err.to_string()))
    }
}

/// Implicit configuration locations, most specific first.
fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("com", "modelgen", "modelgen") {
        Some(dirs) => paths.push(dirs.config_dir().join("config.toml")),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

/// Load the application configuration.
///
/// # Errors
///
/// Fails when an explicit path does not exist, or when the selected file is
/// not valid TOML or names an unusable module or convention.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ModelgenError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    match candidates().into_iter().find(|path| path.exists()) {
        Some(path) => {
            info!(path = path.display().to_string(); "Loading configuration");
            load_config_file(&path)
        }
        None => {
            debug!("No configuration file found, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

fn load_config_file(path: &Path) -> Result<AppConfig, ModelgenError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config).map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(config)
}

/// Reject settings that would produce a module Python cannot import.
fn validate(config: &AppConfig) -> Result<(), String> {
    let module = config.output().properties_module();
    if !is_dotted_identifier(module) {
        return Err(format!("'{module}' is not a Python module path"));
    }

    let naming = config.naming();
    if naming.enumeration_suffixes().iter().any(String::is_empty) {
        return Err("enumeration suffixes must not be empty".to_string());
    }
    if naming.simple_attribute_stereotype().is_empty() {
        return Err("simple attribute stereotype must not be empty".to_string());
    }

    Ok(())
}

fn is_dotted_identifier(path: &str) -> bool {
    path.split('.').all(|part| {
        let mut chars = part.chars();
        chars
            .next()
            .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
            && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_explicit_config() {
        let file = config_file("[output]\nproperties_module = \"gaphor.core.modeling.properties\"\n");

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(
            config.output().properties_module(),
            "gaphor.core.modeling.properties"
        );
        assert_eq!(config.naming().simple_attribute_stereotype(), "SimpleAttribute");
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("/nonexistent/modelgen.toml")).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_malformed_config() {
        let file = config_file("[naming\nenumeration_suffixes = 3\n");

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_invalid_module_path() {
        let file = config_file("[output]\nproperties_module = \"gaphor..properties\"\n");

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("is not a Python module path"));
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let file = config_file("[naming]\nenumeration_suffixes = [\"Kind\", \"\"]\n");

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("enumeration suffixes"));
    }

    #[test]
    fn test_dotted_identifier() {
        assert!(is_dotted_identifier("properties"));
        assert!(is_dotted_identifier("gaphor.core._modeling"));
        assert!(!is_dotted_identifier(""));
        assert!(!is_dotted_identifier("1st.module"));
        assert!(!is_dotted_identifier("with-dash"));
    }
}
