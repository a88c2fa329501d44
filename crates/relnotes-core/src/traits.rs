//! Shared traits.
//!
//! [`ConfigManager`] describes a TOML-backed configuration type. The CLI's
//! generic `config` subcommands are written against it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::util::keys::env_key;

/// A configuration type that lives in a TOML file.
///
/// Implementors supply the project name; path resolution, loading, and
/// export have default implementations.
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Project name used for the config directory and env var prefix.
    fn project_name() -> &'static str;

    /// Environment variable that may point at a config file.
    fn config_env_var() -> String {
        format!("{}_CONFIG", env_key(Self::project_name()))
    }

    /// Platform default: `<config_dir>/<project>/config.toml`.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config path.
    ///
    /// Checks in order:
    /// 1. Explicit path argument
    /// 2. `{PROJECT}_CONFIG` environment variable
    /// 3. Platform default
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(Self::config_env_var()) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_config_path()
    }

    /// Load from a specific file.
    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Load the resolved config file, or defaults when it does not exist.
    fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::load_from(&path)
            }
            Some(path) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Serialize to pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Flatten into `PROJECT_SECTION_KEY=value` pairs.
    ///
    /// Arrays are joined with commas.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::serialization(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&env_key(Self::project_name()), &value, &mut vars);
        Ok(vars)
    }
}

fn flatten_env(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                flatten_env(&format!("{prefix}_{}", env_key(key)), child, out);
            }
        }
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(scalar_string)
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), scalar_string(other))),
    }
}

fn scalar_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
