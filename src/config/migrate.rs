//! Configuration file maintenance: detect and fill keys added by newer
//! releases without touching values the user already set.

use super::{CONFIG_KEYS, Config};
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

/// Keys missing from the configuration file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(CONFIG_KEYS
        .into_iter()
        .filter(|k| !map.contains_key(Value::String(k.to_string())))
        .collect())
}

/// Add missing keys with their default values and rewrite the file.
/// Returns the keys that were added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut map = read_mapping(path)?;
    let defaults = match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => m,
        _ => return Err(AppError::Config("default config is not a mapping".into())),
    };

    for key in &missing {
        let k = Value::String(key.to_string());
        if let Some(v) = defaults.get(&k) {
            map.insert(k, v.clone());
        }
    }

    fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
    Ok(missing)
}
