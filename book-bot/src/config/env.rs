//! Small helpers for reading typed values from the environment.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Non-empty trimmed value of the first set variable among `names`.
pub(crate) fn var_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|n| env::var(n).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

pub(crate) fn var_or(name: &str, default: &str) -> String {
    var_any(&[name]).unwrap_or_else(|| default.to_string())
}

/// Parses `name` when set; unset means `default`, unparsable is an error.
pub(crate) fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var_any(&[name]) {
        Some(v) => v
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, v)),
        None => Ok(default),
    }
}

/// `true/false`, `1/0`, `yes/no`, `on/off` (case-insensitive).
pub(crate) fn bool_or(name: &str, default: bool) -> Result<bool> {
    match var_any(&[name]) {
        Some(v) => match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("{} must be a boolean, got: {}", name, v),
        },
        None => Ok(default),
    }
}

/// Comma-separated list; blanks dropped.
pub(crate) fn list(name: &str) -> Vec<String> {
    var_any(&[name])
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
