//! `relnotes` configuration.
//!
//! Layers are merged with `confyg`: the resolved TOML file (see
//! [`ConfigManager`] for path resolution), then `RELNOTES_<SECTION>_<KEY>`
//! environment variables. Keys missing from both take their defaults.
//!
//! Environment values arrive as strings; they are converted to the type of
//! the key they override. Array-valued keys take comma-separated values.

use std::path::PathBuf;

use confyg::{ConfigError, Confygery, env};
use relnotes_content::{ParseOptions, RenderOptions, ValidationOptions};
use relnotes_core::{ConfigManager, Error, Result};
use serde::{Deserialize, Serialize};

/// Config sections, each overridable as `RELNOTES_<SECTION>_<KEY>`.
pub const SECTIONS: [&str; 5] = ["changelog", "parse", "render", "validate", "logging"];

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelnotesConfig {
    /// Which changelog to operate on.
    pub changelog: ChangelogConfig,
    /// How the changelog is read.
    pub parse: ParseOptions,
    /// How new releases are written.
    pub render: RenderOptions,
    /// Validator switches.
    pub validate: ValidationOptions,
    /// Log output.
    pub logging: LoggingConfig,
}

/// `[changelog]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog path, relative to the working directory.
    pub path: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("RELEASE.md"),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ConfigManager for RelnotesConfig {
    fn project_name() -> &'static str {
        "relnotes"
    }
}

impl RelnotesConfig {
    /// Load the config file and apply overrides from the process environment.
    pub fn load_with_env(explicit: Option<&str>) -> Result<Self> {
        let mut layers = Self::file_layer(explicit)?;
        let mut scan = env::Options::with_top_level(Self::project_name());
        scan.set_sections(SECTIONS.map(String::from).to_vec());
        layers.add_env(scan).map_err(layer_error)?;
        Self::from_layers(&mut layers)
    }

    /// The default configuration as a TOML tree, used as the type schema
    /// for string values.
    pub fn schema() -> Result<toml::Value> {
        toml::Value::try_from(Self::default()).map_err(|e| Error::serialization(e.to_string()))
    }

    fn file_layer(explicit: Option<&str>) -> Result<Confygery> {
        let mut layers = Confygery::new().map_err(layer_error)?;
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let name = path.to_str().ok_or_else(|| {
                    Error::config(format!("Config path {} is not valid UTF-8", path.display()))
                })?;
                log::debug!("Loading config from {name}");
                layers.add_file(name).map_err(layer_error)?;
            }
            Some(path) => log::debug!("No config at {}, using defaults", path.display()),
            None => {}
        }
        Ok(layers)
    }

    fn from_layers(layers: &mut Confygery) -> Result<Self> {
        let mut merged = toml::Value::Table(layers.build().map_err(layer_error)?);
        retype(&mut merged, &Self::schema()?, "")?;
        merged
            .try_into()
            .map_err(|e| Error::config(format!("Invalid configuration: {e}")))
    }
}

fn layer_error(e: ConfigError) -> Error {
    Error::config(format!("Failed to load configuration: {e}"))
}

/// Convert string leaves of `value` to the type `schema` has at the same key.
/// Keys the schema does not know are left for serde to ignore.
fn retype(value: &mut toml::Value, schema: &toml::Value, key: &str) -> Result<()> {
    if let (toml::Value::Table(table), toml::Value::Table(shape)) = (&mut *value, schema) {
        for (name, child) in table.iter_mut() {
            if let Some(expected) = shape.get(name) {
                let dotted = if key.is_empty() {
                    name.clone()
                } else {
                    format!("{key}.{name}")
                };
                retype(child, expected, &dotted)?;
            }
        }
        return Ok(());
    }
    if let toml::Value::String(raw) = &*value {
        *value = typed_value(key, raw, schema)?;
    }
    Ok(())
}

/// Interpret `raw` as a value of the same type as `shape`.
pub fn typed_value(key: &str, raw: &str, shape: &toml::Value) -> Result<toml::Value> {
    let invalid = |kind: &str| Error::config(format!("{key}: expected {kind}, got '{raw}'"));
    let raw = raw.trim();
    Ok(match shape {
        toml::Value::Boolean(_) => {
            toml::Value::Boolean(raw.parse().map_err(|_| invalid("a boolean"))?)
        }
        toml::Value::Integer(_) => {
            toml::Value::Integer(raw.parse().map_err(|_| invalid("an integer"))?)
        }
        toml::Value::Float(_) => toml::Value::Float(raw.parse().map_err(|_| invalid("a number"))?),
        toml::Value::Array(_) => toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        ),
        toml::Value::Table(_) => return Err(invalid("a section, not a value")),
        _ => toml::Value::String(raw.to_string()),
    })
}
