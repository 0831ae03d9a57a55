//! Configuration for nectar.
//!
//! Layers, lowest precedence first:
//!
//! 1. **Built-in defaults**: [`schema::NectarConfig::default()`]
//! 2. **User global config**: `~/.nectar/config.toml`
//! 3. **Project local config**: `.nectar.toml` in the working directory
//! 4. **Environment variables**: `NECTAR_*`
//!
//! Files are merged key by key: a project file that only sets
//! `summarize.max_words` keeps every value the global file chose.
//! A file that is unreadable, malformed, or holds a value of the wrong type
//! is skipped as a whole; the other layers still apply.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

pub use schema::NectarConfig;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> NectarConfig {
    let layers = [global_config_path(), project_config_path()];
    let mut config = load_layers(layers.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> NectarConfig {
    let Ok(mut merged) = toml::Value::try_from(NectarConfig::default()) else {
        return NectarConfig::default();
    };

    for path in paths {
        let Some(layer) = read_toml_value(path) else {
            continue;
        };
        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        let check: std::result::Result<NectarConfig, _> = candidate.clone().try_into();
        if check.is_ok() {
            merged = candidate;
        }
    }

    merged.try_into().unwrap_or_default()
}

fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively overlay `layer` onto `base`. Tables merge, everything else
/// replaces.
fn merge_values(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base_table), toml::Value::Table(layer_table)) => {
            for (key, value) in layer_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// Environment overrides
// ---------------------------------------------------------------------------

/// Apply `NECTAR_*` overrides read through `lookup`.
///
/// - `NECTAR_URL`: backend base URL
/// - `NECTAR_TIMEOUT_MS`: request timeout (0 = none)
/// - `NECTAR_SESSION`: raw `Cookie` header of an existing session
/// - `NECTAR_LOG`: activity log on/off
pub fn apply_env_overrides(config: &mut NectarConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("NECTAR_URL")
        && !url.is_empty()
    {
        config.server.base_url = url;
    }
    if let Some(val) = lookup("NECTAR_TIMEOUT_MS")
        && let Ok(ms) = val.trim().parse::<u64>()
    {
        config.server.timeout_ms = ms;
    }
    if let Some(cookie) = lookup("NECTAR_SESSION") {
        config.server.session_cookie = cookie;
    }
    if let Some(val) = lookup("NECTAR_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Request timeout, `None` when the config asks for no timeout.
pub fn request_timeout(config: &NectarConfig) -> Option<Duration> {
    (config.server.timeout_ms > 0).then(|| Duration::from_millis(config.server.timeout_ms))
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `~/.nectar`
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".nectar"))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir().ok().map(|cwd| cwd.join(".nectar.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// init / set / reset / show
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.nectar/config.toml`.
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
    fs::write(path, NectarConfig::default_toml()).context("failed to write config file")
}

/// Overwrite the global config with defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Set a dotted key (e.g. `summarize.max_words`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_value_in_file(&path, key, value)
}

fn set_value_in_file(path: &Path, key: &str, raw: &str) -> Result<()> {
    let mut root = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str::<toml::Value>(&content).context("config file is not valid TOML")?
    } else {
        toml::Value::try_from(NectarConfig::default())
            .context("failed to serialize default config")?
    };

    // Keys missing from a sparse file are looked up in the defaults so they
    // can still be set.
    let defaults = toml::Value::try_from(NectarConfig::default())
        .context("failed to serialize default config")?;
    let template = lookup_dotted(&defaults, key)
        .with_context(|| format!("unknown config key '{key}'"))?
        .clone();
    let value = coerce_value(&template, key, raw)?;
    insert_dotted(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let check: std::result::Result<NectarConfig, _> = root.clone().try_into();
    check.with_context(|| format!("invalid value '{raw}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    let text = toml::to_string_pretty(&root).context("failed to serialize config")?;
    fs::write(path, text).context("failed to write config file")
}

fn lookup_dotted<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |node, part| node.get(part))
}

fn insert_dotted(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let (sections, leaf) = match key.rsplit_once('.') {
        Some((sections, leaf)) => (Some(sections), leaf),
        None => (None, key),
    };

    let mut node = root;
    for part in sections.into_iter().flat_map(|s| s.split('.')) {
        let table = node
            .as_table_mut()
            .with_context(|| format!("'{part}' in '{key}' is not a table"))?;
        node = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    node.as_table_mut()
        .with_context(|| format!("cannot set '{key}': parent is not a table"))?
        .insert(leaf.to_string(), value);
    Ok(())
}

/// Parse `raw` into the same TOML type as `template`.
fn coerce_value(template: &toml::Value, key: &str, raw: &str) -> Result<toml::Value> {
    Ok(match template {
        toml::Value::Boolean(_) => toml::Value::Boolean(is_truthy(raw)),
        toml::Value::Integer(_) => toml::Value::Integer(
            raw.trim()
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw}'"))?,
        ),
        toml::Value::Float(_) => toml::Value::Float(
            raw.trim()
                .parse()
                .with_context(|| format!("expected number for '{key}', got '{raw}'"))?,
        ),
        toml::Value::Array(_) => toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        ),
        toml::Value::Table(_) => anyhow::bail!("'{key}' is a section, not a value"),
        _ => toml::Value::String(raw.to_string()),
    })
}

/// The effective configuration as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}
