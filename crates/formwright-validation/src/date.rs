//! Date rules: `dateformat`, `minimumage=N`, `maximumage=N`.
//!
//! Values are parsed with the configured chrono format. An unparseable value
//! fails every date rule. Ages are whole years on the clock's current date;
//! both age boundaries are inclusive.

use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Names of the date rules.
pub const DATE_RULES: &[&str] = &["dateformat", "minimumage", "maximumage"];

/// Source of "today" for age computations.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Returns a clock reading the local date.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(|| Local::now().date_naive())
}

/// Returns a clock that always reads `date`.
#[must_use]
pub fn fixed_clock(date: NaiveDate) -> Clock {
    Arc::new(move || date)
}

/// Whole years between `birth` and `today`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use formwright_validation::age_on;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// assert_eq!(age_on(NaiveDate::from_ymd_opt(2006, 6, 15).unwrap(), today), 18);
/// assert_eq!(age_on(NaiveDate::from_ymd_opt(2006, 6, 16).unwrap(), today), 17);
/// ```
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// The date rule set bound to one format and clock.
#[derive(Clone)]
pub(crate) struct DateRules {
    format: String,
    clock: Clock,
}

impl DateRules {
    pub(crate) fn new(format: String, clock: Clock) -> Self {
        Self { format, clock }
    }

    pub(crate) fn format(&self) -> &str {
        &self.format
    }

    /// Evaluates a date rule; `None` when `name` is not one.
    pub(crate) fn check(&self, name: &str, param: Option<&str>, value: &str) -> Option<bool> {
        let passed = match name {
            "dateformat" => self.parse(value).is_some(),
            "minimumage" => self.check_age(name, param, value, |age, limit| age >= limit),
            "maximumage" => self.check_age(name, param, value, |age, limit| age <= limit),
            _ => return None,
        };
        Some(passed)
    }

    fn parse(&self, value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), &self.format).ok()
    }

    fn check_age(
        &self,
        name: &str,
        param: Option<&str>,
        value: &str,
        within: impl FnOnce(i32, i32) -> bool,
    ) -> bool {
        let Some(limit) = param.and_then(|p| p.trim().parse::<i32>().ok()) else {
            warn!(rule = name, param = ?param, "age rule requires a whole number of years");
            return false;
        };
        match self.parse(value) {
            Some(birth) => within(age_on(birth, (self.clock)()), limit),
            None => false,
        }
    }
}

impl fmt::Debug for DateRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRules")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
