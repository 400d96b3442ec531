use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::NamedExportsError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamedExportsConfig {
    /// Globs of file ids to transform; empty means every file.
    pub include: Vec<String>,
    /// Globs of file ids to skip; empty means `**/node_modules/**`.
    pub exclude: Vec<String>,
    /// Library globs left to the host and never analyzed.
    pub external: Vec<String>,
    pub source_map: bool,
    pub hires: bool,
    pub default_requires: bool,
    pub root: Option<PathBuf>,
}

impl Default for NamedExportsConfig {
    fn default() -> Self {
        Self {
            include: vec![],
            exclude: vec![],
            external: vec![],
            source_map: true,
            hires: false,
            default_requires: true,
            root: None,
        }
    }
}

pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
        .unwrap_or(start)
        .to_path_buf()
}

pub fn discover_config_path(project_root: &Path) -> Option<PathBuf> {
    let names = [
        "named-exports.toml",
        "named-exports.config.json",
        "named-exports.config.json5",
        "named-exports.config.jsonc",
        "named-exports.config.yaml",
        "named-exports.config.yml",
        ".namedexportsrc",
        ".namedexportsrc.json",
        ".namedexportsrc.json5",
        ".namedexportsrc.jsonc",
        ".namedexportsrc.yaml",
        ".namedexportsrc.yml",
    ];
    names
        .into_iter()
        .map(|name| project_root.join(name))
        .find(|p| p.exists())
}

pub fn load_config(project_root: &Path) -> Result<NamedExportsConfig, NamedExportsError> {
    if let Some(path) = discover_config_path(project_root) {
        return load_config_from_path(&path);
    }
    load_package_json_config(project_root)
}

pub fn load_config_from_path(path: &Path) -> Result<NamedExportsConfig, NamedExportsError> {
    let ext = path
        .extension()
        .and_then(|x| x.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" | "json5" | "jsonc" | "" => load_json_config(path),
        "yaml" | "yml" => load_yaml_config(path),
        "toml" => load_toml_config(path),
        _ => Ok(NamedExportsConfig::default()),
    }
}

fn read_config_text(path: &Path) -> Result<String, NamedExportsError> {
    std::fs::read_to_string(path).map_err(|source| NamedExportsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn config_parse_error(path: &Path, message: impl ToString) -> NamedExportsError {
    NamedExportsError::ConfigParse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn load_json_config(path: &Path) -> Result<NamedExportsConfig, NamedExportsError> {
    let raw = read_config_text(path)?;
    json5::from_str::<NamedExportsConfig>(&raw)
        .or_else(|_| serde_json::from_str::<NamedExportsConfig>(&raw))
        .map_err(|err| config_parse_error(path, err))
}

fn load_yaml_config(path: &Path) -> Result<NamedExportsConfig, NamedExportsError> {
    let raw = read_config_text(path)?;
    serde_yaml::from_str::<NamedExportsConfig>(&raw).map_err(|err| config_parse_error(path, err))
}

fn load_toml_config(path: &Path) -> Result<NamedExportsConfig, NamedExportsError> {
    let raw = read_config_text(path)?;
    let toml_value =
        toml::from_str::<toml::Value>(&raw).map_err(|err| config_parse_error(path, err))?;
    let json_value = serde_json::to_value(toml_value).map_err(|err| config_parse_error(path, err))?;
    serde_json::from_value::<NamedExportsConfig>(normalize_keys_to_camel_case(&json_value))
        .map_err(|err| config_parse_error(path, err))
}

/// Reads the `"namedExports"` key of `package.json` when present.
fn load_package_json_config(project_root: &Path) -> Result<NamedExportsConfig, NamedExportsError> {
    let package_json = project_root.join("package.json");
    if !package_json.is_file() {
        return Ok(NamedExportsConfig::default());
    }
    let raw = read_config_text(&package_json)?;
    let value = serde_json::from_str::<JsonValue>(&raw)
        .map_err(|err| config_parse_error(&package_json, err))?;
    let Some(section) = value.get("namedExports") else {
        return Ok(NamedExportsConfig::default());
    };
    serde_json::from_value::<NamedExportsConfig>(section.clone())
        .map_err(|err| config_parse_error(&package_json, err))
}

fn normalize_keys_to_camel_case(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(object) => JsonValue::Object(
            object
                .iter()
                .map(|(key, value)| (snake_to_camel(key), normalize_keys_to_camel_case(value)))
                .collect(),
        ),
        JsonValue::Array(array) => {
            JsonValue::Array(array.iter().map(normalize_keys_to_camel_case).collect())
        }
        other => other.clone(),
    }
}

fn snake_to_camel(key: &str) -> String {
    if !key.contains('_') {
        return key.to_string();
    }
    let mut segments = key.split('_').filter(|segment| !segment.is_empty());
    let Some(first_segment) = segments.next() else {
        return key.to_string();
    };
    let mut normalized = String::from(first_segment);
    for segment in segments {
        let mut chars = segment.chars();
        let Some(first_char) = chars.next() else {
            continue;
        };
        normalized.push(first_char.to_ascii_uppercase());
        normalized.extend(chars);
    }
    normalized
}
