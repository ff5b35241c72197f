use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Default config filenames checked when `--config` is not provided.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["meshbench.yaml", "meshbench.yml", "meshbench.json"];

/// Loads the configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when no config file exists or it cannot be read or
/// parsed.
pub fn load_config(path: Option<&str>) -> AppResult<ConfigFile> {
    if let Some(path) = path {
        return load_config_file(Path::new(path));
    }

    for candidate in DEFAULT_CONFIG_FILES {
        let candidate = PathBuf::from(candidate);
        if candidate.exists() {
            return load_config_file(&candidate);
        }
    }

    Err(AppError::config(ConfigError::NoConfigFound))
}

/// Reads and parses a single config file, dispatching on its extension.
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unsupported
/// extension, or fails to parse.
pub fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}
