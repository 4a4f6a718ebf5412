/// Configuration system for repopulse.
///
/// Layers, lowest to highest precedence:
///
/// 1. **Built-in defaults**: [`schema::RepopulseConfig::default()`]
/// 2. **User global config**: `~/.repopulse/config.toml`
/// 3. **Project local config**: `.repopulse.toml` in the current directory
/// 4. **Environment variables**: `REPOPULSE_*`
///
/// File layers are merged key by key, so a project file that only sets
/// `source.repo` keeps the global file's `source.metrics_url`.
///
/// The resolved value is passed explicitly into the metrics provider and the
/// web server; nothing reads the environment after [`load`] returns.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::RepopulseConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration from files and the process
/// environment.
pub fn load() -> RepopulseConfig {
    let paths = [global_config_path(), project_config_path()];
    let mut config = load_layers(paths.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
///
/// Missing or malformed files are skipped.
pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> RepopulseConfig {
    let mut merged = match toml::Value::try_from(RepopulseConfig::default()) {
        Ok(value) => value,
        Err(_) => return RepopulseConfig::default(),
    };

    for path in paths {
        if let Some(layer) = read_toml_value(path) {
            merge_tables(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_default()
}

fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // Reject files whose values don't fit the schema.
    value.clone().try_into::<RepopulseConfig>().ok()?;
    Some(value)
}

/// Recursively overlay `overlay` onto `base`: tables merge, scalars replace.
fn merge_tables(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_tables(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".repopulse").join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".repopulse.toml"))
}

/// Path of the global config file, for display and `config init`.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Path of the project config file, for display.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply `REPOPULSE_*` overrides read through `lookup`.
///
/// Supported variables:
/// - `REPOPULSE_METRICS_URL`: metrics endpoint (may be set empty to force
///   synthetic data)
/// - `REPOPULSE_REPO`: repository identifier
/// - `REPOPULSE_DAYS`: default window (`7`, `14`, `30`)
/// - `REPOPULSE_STRICT`: strict series validation (`1`/`true`/`yes`/`on`)
/// - `REPOPULSE_WEB_ADDR`: dashboard bind address
/// - `REPOPULSE_LOG`: log level
pub fn apply_env_overrides<F>(config: &mut RepopulseConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("REPOPULSE_METRICS_URL") {
        config.source.metrics_url = val;
    }
    if let Some(val) = lookup("REPOPULSE_REPO")
        && !val.trim().is_empty()
    {
        config.source.repo = val;
    }
    if let Some(val) = lookup("REPOPULSE_DAYS")
        && let Ok(range) = val.parse()
    {
        config.source.default_days = range;
    }
    if let Some(val) = lookup("REPOPULSE_STRICT") {
        config.source.strict_validation = is_truthy(&val);
    }
    if let Some(val) = lookup("REPOPULSE_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = lookup("REPOPULSE_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.repopulse/config.toml`.
///
/// Fails if the file exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, RepopulseConfig::default_toml()).context("failed to write config file")
}

/// Overwrite the global config with defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Set one dotted key (e.g. `source.metrics_url`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_value_in_file(&path, key, value)
}

fn set_value_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config file")?
    } else {
        toml::Value::try_from(RepopulseConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Refuse to write something `load` would later ignore.
    root.clone()
        .try_into::<RepopulseConfig>()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    let text = toml::to_string_pretty(&root).context("failed to serialize config")?;
    fs::write(path, text).context("failed to write config file")
}

/// Set `key` in a TOML tree, parsing `raw` according to the schema default's
/// type for that key.
fn set_toml_value(root: &mut toml::Value, key: &str, raw: &str) -> Result<()> {
    let (section, leaf) = key
        .split_once('.')
        .with_context(|| format!("config key must be '<section>.<name>', got '{key}'"))?;

    let defaults =
        toml::Value::try_from(RepopulseConfig::default()).context("failed to serialize defaults")?;
    let template = defaults
        .get(section)
        .with_context(|| format!("unknown config section '{section}'"))?;

    let new_value = match template.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw)),
        Some(toml::Value::Integer(_)) => toml::Value::Integer(
            raw.parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw}'"))?,
        ),
        Some(_) => toml::Value::String(raw.to_string()),
        // Optional keys absent from the serialized defaults.
        None if section == "source" && leaf == "seed" => toml::Value::Integer(
            raw.parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw}'"))?,
        ),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    let table = root
        .as_table_mut()
        .context("config root is not a table")?
        .entry(section.to_string())
        .or_insert(toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;
    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// The effective configuration rendered as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
