use clap::Subcommand;
use mednova_core::{write_atomic, MednovaPaths};
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. gemini_api_key)
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Remove a config value
    Unset {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

/// Keys understood by `Settings`.
const KNOWN_KEYS: &[&str] = &[
    "gemini_api_key",
    "gemini_endpoint",
    "livekit_api_key",
    "livekit_api_secret",
];

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, paths: &MednovaPaths) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(paths, &key, &value),
        ConfigCmd::Get { key } => get(paths, &key),
        ConfigCmd::Unset { key } => unset(paths, &key),
        ConfigCmd::List => list(paths),
    }
}

// ── Command Implementations ──

/// Read config from `.mednova/config.json`. Returns empty map if file doesn't exist.
fn read_config(path: &Path) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    if !path.exists() {
        return Ok(serde_json::Map::new());
    }
    let content = std::fs::read_to_string(path)?;
    let val: serde_json::Value = serde_json::from_str(&content)?;
    match val {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

/// Write config to `.mednova/config.json`.
fn write_config(
    path: &Path,
    config: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&config)?;
    write_atomic(path, json.as_bytes())?;
    Ok(())
}

fn check_key(key: &str) -> anyhow::Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        anyhow::bail!("unknown config key '{key}' (known: {})", KNOWN_KEYS.join(", "));
    }
    Ok(())
}

fn require_workspace(paths: &MednovaPaths) -> anyhow::Result<()> {
    if !paths.is_initialized() {
        anyhow::bail!("No .mednova/ workspace found. Run `mednova init` first.");
    }
    Ok(())
}

/// Credentials print as their first four characters only.
fn display_value(key: &str, val: &serde_json::Value) -> String {
    let s = match val {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if key.ends_with("_key") || key.ends_with("_secret") {
        let head: String = s.chars().take(4).collect();
        format!("{head}****")
    } else {
        s
    }
}

/// `mednova config set <key> <value>`
pub fn set(paths: &MednovaPaths, key: &str, value: &str) -> anyhow::Result<()> {
    require_workspace(paths)?;
    check_key(key)?;
    let mut config = read_config(&paths.config_json)?;
    // always strings: a numeric-looking key is still a key
    config.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    write_config(&paths.config_json, &config)?;
    println!("{key} = {}", display_value(key, &config[key]));
    Ok(())
}

/// `mednova config get <key>`
pub fn get(paths: &MednovaPaths, key: &str) -> anyhow::Result<()> {
    require_workspace(paths)?;
    let config = read_config(&paths.config_json)?;
    match config.get(key) {
        Some(val) => println!("{}", display_value(key, val)),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `mednova config unset <key>`
pub fn unset(paths: &MednovaPaths, key: &str) -> anyhow::Result<()> {
    require_workspace(paths)?;
    let mut config = read_config(&paths.config_json)?;
    if config.remove(key).is_some() {
        write_config(&paths.config_json, &config)?;
        println!("removed {key}");
    } else {
        println!("(not set)");
    }
    Ok(())
}

/// `mednova config list`
pub fn list(paths: &MednovaPaths) -> anyhow::Result<()> {
    require_workspace(paths)?;
    let config = read_config(&paths.config_json)?;
    if config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in &config {
            println!("{k} = {}", display_value(k, v));
        }
    }
    Ok(())
}
