//! `relnotes config` subcommands.
//!
//! Keys are dotted `section.key` paths into [`RelnotesConfig`]. `get` and
//! `export` show the effective configuration (file plus environment
//! overrides); `set` and `init` edit the config file.

use std::io::Write;
use std::path::{Path, PathBuf};

use relnotes_core::{ConfigManager, Error as CoreError};

use crate::cli::ConfigAction;
use crate::commands::Context;
use crate::config::{RelnotesConfig, SECTIONS, typed_value};
use crate::error::Result;

/// Run a config subcommand.
pub fn handle_config_command<W: Write>(
    ctx: &Context,
    action: ConfigAction,
    out: &mut W,
) -> Result<()> {
    let explicit = ctx.config_path.as_deref();
    match action {
        ConfigAction::Path => {
            let path = config_file(explicit)?;
            writeln!(out, "{}", path.display())?;
            if !path.exists() {
                log::warn!("{} does not exist; run `relnotes config init`", path.display());
            }
            Ok(())
        }
        ConfigAction::Get { key } => {
            let tree = effective_tree(&ctx.config)?;
            writeln!(out, "{}", display_value(lookup(&tree, &key)?)?)?;
            Ok(())
        }
        ConfigAction::Set { key, value } => set(&config_file(explicit)?, &key, &value, out),
        ConfigAction::Init { file, force } => {
            let path = match file {
                Some(file) => PathBuf::from(file),
                None => config_file(explicit)?,
            };
            init(&path, force, out)
        }
        ConfigAction::Export { docker_env } => {
            let flag = if docker_env { "--env " } else { "" };
            for (key, value) in ctx.config.to_env_vars()? {
                writeln!(out, "{flag}{key}={value}")?;
            }
            Ok(())
        }
    }
}

fn config_file(explicit: Option<&str>) -> Result<PathBuf> {
    Ok(RelnotesConfig::resolve_config_path(explicit).ok_or_else(|| {
        CoreError::config("Could not determine config directory for this platform")
    })?)
}

fn effective_tree(config: &RelnotesConfig) -> Result<toml::Value> {
    Ok(toml::Value::try_from(config).map_err(|e| CoreError::serialization(e.to_string()))?)
}

/// Resolve `section` or `section.key` against a configuration tree.
fn lookup<'a>(tree: &'a toml::Value, key: &str) -> Result<&'a toml::Value> {
    let (section, name) = match key.split_once('.') {
        Some((section, name)) => (section, Some(name)),
        None => (key, None),
    };
    let table = tree
        .get(section)
        .filter(|_| SECTIONS.contains(&section))
        .ok_or_else(|| {
            CoreError::config(format!(
                "Unknown section '{section}'; expected one of: {}",
                SECTIONS.join(", ")
            ))
        })?;
    let Some(name) = name else {
        return Ok(table);
    };
    table.get(name).ok_or_else(|| {
        let known: Vec<&str> = table
            .as_table()
            .map(|t| t.keys().map(String::as_str).collect())
            .unwrap_or_default();
        CoreError::config(format!(
            "Unknown key '{key}'; [{section}] has: {}",
            known.join(", ")
        ))
        .into()
    })
}

fn display_value(value: &toml::Value) -> Result<String> {
    Ok(match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Result<Vec<_>>>()?
            .join(", "),
        toml::Value::Table(_) => toml::to_string_pretty(value)
            .map_err(|e| CoreError::serialization(e.to_string()))?
            .trim_end()
            .to_string(),
        other => other.to_string(),
    })
}

/// Write `section.key = value` into the config file, typed after the key's
/// default. The edited file must still load, so nothing is written for a
/// value serde would reject.
fn set<W: Write>(path: &Path, key: &str, raw: &str, out: &mut W) -> Result<()> {
    let schema = RelnotesConfig::schema()?;
    let value = typed_value(key, raw, lookup(&schema, key)?)?;
    let (section, name) = key
        .split_once('.')
        .ok_or_else(|| CoreError::config(format!("'{key}' is a section; use section.key")))?;

    if !path.exists() {
        return Err(CoreError::config(format!(
            "Config file does not exist at {}. Run `relnotes config init` first.",
            path.display()
        ))
        .into());
    }
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::io_with_path(e, path))?;
    let mut doc: toml::Table = toml::from_str(&content)
        .map_err(|e| CoreError::config(format!("Failed to parse {}: {e}", path.display())))?;

    doc.entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| {
            CoreError::config(format!("[{section}] in {} is not a table", path.display()))
        })?
        .insert(name.to_string(), value);
    toml::Value::Table(doc.clone())
        .try_into::<RelnotesConfig>()
        .map_err(|e| CoreError::config(format!("Invalid value for '{key}': {e}")))?;

    let text = toml::to_string_pretty(&doc).map_err(|e| CoreError::serialization(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| CoreError::io_with_path(e, path))?;
    writeln!(out, "Set {key} = {raw} in {}", path.display())?;
    Ok(())
}

fn init<W: Write>(path: &Path, force: bool, out: &mut W) -> Result<()> {
    if path.exists() && !force {
        return Err(CoreError::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        ))
        .into());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CoreError::io_with_path(e, parent))?;
    }
    let text = RelnotesConfig::default().to_toml_string()?;
    std::fs::write(path, text).map_err(|e| CoreError::io_with_path(e, path))?;
    writeln!(out, "Config file created at {}", path.display())?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
