//! General-purpose rules.
//!
//! | Rule | Parameter | Passes when |
//! |------|-----------|-------------|
//! | `required` | - | value is not empty |
//! | `email` | - | value looks like `local@domain.tld` |
//! | `url` | - | value has a scheme and a host |
//! | `min`, `max`, `len` | count | character count is `>=`, `<=`, `==` |
//! | `gt`, `gte`, `lt`, `lte` | number | value is numeric and compares |
//! | `eq`, `ne` | text | value equals / differs |
//! | `oneof` | space-separated list | value is one of the entries |
//! | `numeric` | - | optional sign, digits, optional fraction |
//! | `alpha`, `alphanum` | - | ASCII letters (and digits) only |
//! | `lowercase`, `uppercase` | - | non-empty and already in that case |
//! | `contains`, `startswith`, `endswith` | text | substring test |
//!
//! `omitempty` is handled by the provider before any rule runs.

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Names of every general-purpose rule.
pub const BUILTIN_RULES: &[&str] = &[
    "required",
    "email",
    "url",
    "min",
    "max",
    "len",
    "gt",
    "gte",
    "lt",
    "lte",
    "eq",
    "ne",
    "oneof",
    "numeric",
    "alpha",
    "alphanum",
    "lowercase",
    "uppercase",
    "contains",
    "startswith",
    "endswith",
];

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
static URL: OnceLock<Option<Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)+$").ok())
        .as_ref()
}

fn url_regex() -> Option<&'static Regex> {
    URL.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+[^\s]*$").ok())
        .as_ref()
}

/// Evaluates a general-purpose rule.
///
/// Returns `None` when `name` is not a general-purpose rule.
pub fn check(name: &str, param: Option<&str>, value: &str) -> Option<bool> {
    let passed = match name {
        "required" => !value.is_empty(),
        "email" => email_regex().is_some_and(|re| re.is_match(value)),
        "url" => url_regex().is_some_and(|re| re.is_match(value)),
        "min" => with_count(name, param, |n| char_count(value) >= n),
        "max" => with_count(name, param, |n| char_count(value) <= n),
        "len" => with_count(name, param, |n| char_count(value) == n),
        "gt" => compare(name, param, value, |v, p| v > p),
        "gte" => compare(name, param, value, |v, p| v >= p),
        "lt" => compare(name, param, value, |v, p| v < p),
        "lte" => compare(name, param, value, |v, p| v <= p),
        "eq" => with_param(name, param, |p| value == p),
        "ne" => with_param(name, param, |p| value != p),
        "oneof" => with_param(name, param, |p| p.split_whitespace().any(|c| c == value)),
        "numeric" => is_numeric(value),
        "alpha" => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
        "alphanum" => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()),
        "lowercase" => !value.is_empty() && value == value.to_lowercase(),
        "uppercase" => !value.is_empty() && value == value.to_uppercase(),
        "contains" => with_param(name, param, |p| value.contains(p)),
        "startswith" => with_param(name, param, |p| value.starts_with(p)),
        "endswith" => with_param(name, param, |p| value.ends_with(p)),
        _ => return None,
    };
    Some(passed)
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn with_param(name: &str, param: Option<&str>, f: impl FnOnce(&str) -> bool) -> bool {
    match param {
        Some(param) => f(param),
        None => {
            warn!(rule = name, "rule requires a parameter");
            false
        }
    }
}

fn with_count(name: &str, param: Option<&str>, f: impl FnOnce(usize) -> bool) -> bool {
    with_param(name, param, |p| match p.trim().parse::<usize>() {
        Ok(n) => f(n),
        Err(_) => {
            warn!(rule = name, param = p, "rule parameter is not a count");
            false
        }
    })
}

fn compare(name: &str, param: Option<&str>, value: &str, f: impl FnOnce(f64, f64) -> bool) -> bool {
    with_param(name, param, |p| {
        let Ok(limit) = p.trim().parse::<f64>() else {
            warn!(rule = name, param = p, "rule parameter is not a number");
            return false;
        };
        if !is_numeric(value) {
            return false;
        }
        value.parse::<f64>().is_ok_and(|v| f(v, limit))
    })
}

fn is_numeric(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}
