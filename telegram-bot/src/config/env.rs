//! Environment lookups shared by every config loader.

use std::env;
use std::str::FromStr;

/// Trimmed value of `name`; `None` when unset or blank.
pub fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First non-blank value among `names`, in order (primary name, then aliases).
pub fn env_first_non_empty(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env_non_empty(name))
}

/// Parsed value of `name`; `default` when unset or unparsable.
pub fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env_non_empty(name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
