//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use dagscope::{DagscopeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for DagscopeError {
    fn from(err: ConfigError) -> Self {
        DagscopeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (dagscope/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds invalid values
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DagscopeError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("dagscope/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "dagscope", "dagscope") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DagscopeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;

    Ok(config)
}

/// Rejects colors and spacings that would only fail once the scene is
/// laid out or rendered.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .layout()
        .validate()
        .map_err(|err| ConfigError::Validation(err.to_string()))?;

    let style = config.style();
    style.node_color().map_err(ConfigError::Validation)?;
    style.node_stroke_color().map_err(ConfigError::Validation)?;
    style.highlight_color().map_err(ConfigError::Validation)?;
    style.edge_color().map_err(ConfigError::Validation)?;
    style.background_color().map_err(ConfigError::Validation)?;

    if config.locate().tolerance() < 0.0 {
        return Err(ConfigError::Validation(
            "locate tolerance must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let file = config_file(
            r#"
            [layout]
            horizontal_spacing = 120.0

            [locate]
            tolerance = 4.0
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout().horizontal_spacing(), 120.0);
        assert_eq!(config.locate().tolerance(), 4.0);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, DagscopeError::Config(msg) if msg.contains("Missing configuration file")));
    }

    #[test]
    fn test_invalid_toml() {
        let file = config_file("[layout\nengine = ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, DagscopeError::Config(msg) if msg.starts_with("Failed to parse")));
    }

    #[test]
    fn test_invalid_color_is_rejected_early() {
        let file = config_file("[style]\nedge_color = \"definitely-not-a-color\"\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, DagscopeError::Config(msg) if msg.starts_with("Validation error")));
    }

    #[test]
    fn test_zero_spacing_is_rejected_early() {
        let file = config_file("[layout]\nhorizontal_spacing = 0.0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(
            matches!(err, DagscopeError::Config(msg) if msg.contains("invalid horizontal spacing"))
        );
    }
}
