//! String normalisation directives.
//!
//! Form fields may declare conform directives (for example `"trim lower"`)
//! which the default decoder applies to every submitted value before the
//! data object is populated. Directives run left to right; unknown directives
//! are ignored with a debug log.
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `trim` / `ltrim` / `rtrim` | strip surrounding whitespace |
//! | `lower` / `upper` | change case |
//! | `title` | capitalise every word |
//! | `ucfirst` | capitalise the first character |
//! | `email` | `trim` + `lower` |
//! | `num` / `!num` | keep / drop ASCII digits |
//! | `alpha` / `!alpha` | keep / drop alphabetic characters |

use tracing::debug;

/// Applies a directive list to a single value.
///
/// # Example
///
/// ```
/// use formwright_core::conform;
///
/// assert_eq!(conform::apply("  Alice@Example.COM ", "email"), "alice@example.com");
/// assert_eq!(conform::apply("+49 (30) 1234", "num"), "49301234");
/// assert_eq!(conform::apply("jane  doe", "trim,title"), "Jane  Doe");
/// ```
#[must_use]
pub fn apply(value: &str, directives: &str) -> String {
    directives
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|d| !d.is_empty())
        .fold(value.to_string(), |acc, directive| apply_one(&acc, directive))
}

fn apply_one(value: &str, directive: &str) -> String {
    match directive {
        "trim" => value.trim().to_string(),
        "ltrim" => value.trim_start().to_string(),
        "rtrim" => value.trim_end().to_string(),
        "lower" => value.to_lowercase(),
        "upper" => value.to_uppercase(),
        "title" => title_case(value),
        "ucfirst" => upper_first(value),
        "email" => value.trim().to_lowercase(),
        "num" => value.chars().filter(char::is_ascii_digit).collect(),
        "!num" => value.chars().filter(|c| !c.is_ascii_digit()).collect(),
        "alpha" => value.chars().filter(|c| c.is_alphabetic()).collect(),
        "!alpha" => value.chars().filter(|c| !c.is_alphabetic()).collect(),
        other => {
            debug!(directive = other, "ignoring unknown conform directive");
            value.to_string()
        }
    }
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
