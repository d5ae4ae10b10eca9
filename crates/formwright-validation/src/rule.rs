//! Rule expressions.
//!
//! A rule expression is a comma-separated list of rule usages, each a name
//! with an optional single parameter: `required,min=2,oneof=red green`.

use formwright_core::ValidationError;

/// One rule usage inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<'a> {
    /// Rule name.
    pub name: &'a str,
    /// Parameter after `=`, if any.
    pub param: Option<&'a str>,
}

impl<'a> Rule<'a> {
    /// Parses a single usage such as `min=2`.
    ///
    /// Returns `None` for a blank usage.
    #[must_use]
    pub fn parse(usage: &'a str) -> Option<Self> {
        let usage = usage.trim();
        if usage.is_empty() {
            return None;
        }
        let rule = match usage.split_once('=') {
            Some((name, param)) => Self {
                name: name.trim(),
                param: Some(param),
            },
            None => Self {
                name: usage,
                param: None,
            },
        };
        Some(rule)
    }

    /// Tag used in message keys: the rule name without its parameter.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        self.name
    }
}

/// Parses a rule expression, skipping blank usages.
///
/// # Example
///
/// ```
/// use formwright_validation::parse_rules;
///
/// let rules = parse_rules("required, min=2 ,,oneof=a b");
/// let names: Vec<_> = rules.iter().map(|r| r.name).collect();
/// assert_eq!(names, ["required", "min", "oneof"]);
/// assert_eq!(rules[2].param, Some("a b"));
/// ```
#[must_use]
pub fn parse_rules(expression: &str) -> Vec<Rule<'_>> {
    expression.split(',').filter_map(Rule::parse).collect()
}

/// Returns `true` if `name` can be used as a rule name.
#[must_use]
pub fn is_valid_rule_name(name: &str) -> bool {
    !name.is_empty() && !name.contains([',', '=']) && !name.chars().any(char::is_whitespace)
}

/// Builds the finding for a failed field rule: key `formError.<field>.<rule>`.
#[must_use]
pub fn field_error(field: &str, rule: &str) -> ValidationError {
    ValidationError::new(
        format!("formError.{field}.{rule}"),
        format!("field validation for '{field}' failed on the '{rule}' tag"),
    )
}

/// Builds a struct-level finding: key `formError.<rule>`.
#[must_use]
pub fn struct_error(rule: &str) -> ValidationError {
    ValidationError::new(
        format!("formError.{rule}"),
        format!("struct validation failed on the '{rule}' tag"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_param() {
        assert_eq!(
            Rule::parse("required"),
            Some(Rule {
                name: "required",
                param: None
            })
        );
    }

    #[test]
    fn test_parse_with_param() {
        let rule = Rule::parse(" minimumage=18 ").unwrap();
        assert_eq!(rule.name, "minimumage");
        assert_eq!(rule.param, Some("18"));
    }

    #[test]
    fn test_parse_keeps_param_verbatim() {
        let rule = Rule::parse("eq=a=b").unwrap();
        assert_eq!(rule.name, "eq");
        assert_eq!(rule.param, Some("a=b"));
    }

    #[test]
    fn test_parse_blank() {
        assert!(Rule::parse("   ").is_none());
        assert!(parse_rules("").is_empty());
        assert_eq!(parse_rules(",required,").len(), 1);
    }

    #[test]
    fn test_rule_names() {
        assert!(is_valid_rule_name("zipcode"));
        assert!(!is_valid_rule_name(""));
        assert!(!is_valid_rule_name("zip code"));
        assert!(!is_valid_rule_name("zip=code"));
    }

    #[test]
    fn test_message_keys() {
        assert_eq!(
            field_error("firstname", "required").message_key,
            "formError.firstname.required"
        );
        assert_eq!(
            struct_error("passwordMismatch").message_key,
            "formError.passwordMismatch"
        );
    }
}
