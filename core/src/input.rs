use std::collections::HashMap;
use anyhow::{anyhow, Result};

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits free words from `key:value` tokens. Free words form the name.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

/// Like [`parse_args`], but only tokens whose key expands to one of
/// `candidates` become metadata. Keys come back expanded. Anything else,
/// such as `10:30` in a note, stays a free word.
pub fn parse_known_args(args: &[String], candidates: &[&str]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':').filter(|(k, _)| !k.is_empty()) {
            if let Ok(full_key) = expand_key(key, candidates) {
                metadata.insert(full_key, value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Expands every metadata key, failing on the first unknown or ambiguous one.
pub fn normalize_metadata(
    metadata: HashMap<String, String>,
    candidates: &[&str],
) -> Result<HashMap<String, String>> {
    let mut normalized = HashMap::new();
    for (key, value) in metadata {
        let full_key = expand_key(&key, candidates)?;
        normalized.insert(full_key, value);
    }
    Ok(normalized)
}

pub fn parse_number(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| anyhow!("Invalid {}: '{}' is not a number", field, value))
}

pub fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Ok(true),
        "n" | "no" | "false" | "0" | "off" => Ok(false),
        _ => Err(anyhow!("Expected yes or no, got '{}'", value)),
    }
}
