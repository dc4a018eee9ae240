//! `${VAR}` substitution for configuration values.
//!
//! Every `${NAME}` inside a string is replaced with the value of the
//! environment variable `NAME`, or with nothing when it is unset. There is no
//! escape syntax; a `${` without a closing brace on the same line is kept as is.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::env;
use toml::Value;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}\n]*)\}").expect("placeholder pattern"));

/// Recursively substitutes placeholders in every string leaf of `value`.
pub fn substitute_env_vars(value: Value) -> Value {
    substitute_value_with(value, &|name| env::var(name).ok())
}

pub fn substitute_value_with(value: Value, lookup: &dyn Fn(&str) -> Option<String>) -> Value {
    match value {
        Value::String(text) => Value::String(substitute_str_with(&text, lookup)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| substitute_value_with(item, lookup))
                .collect(),
        ),
        Value::Table(table) => Value::Table(
            table
                .into_iter()
                .map(|(key, item)| (key, substitute_value_with(item, lookup)))
                .collect(),
        ),
        other => other,
    }
}

pub fn substitute_str_with(input: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
        .into_owned()
}
