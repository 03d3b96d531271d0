//! Validation of free-text selections against the fixed enumerations.
//!
//! The interactive shell loops on [`BikeshareError::InvalidSelection`]; this
//! module only decides whether a single answer is acceptable.

use std::sync::OnceLock;

use chrono::Weekday;
use regex::Regex;

use crate::error::{BikeshareError, Result};
use crate::models::{City, Month, Selector};
use crate::time_utils::{weekday_name, WEEKDAYS};

/// Trim, lower-case and collapse runs of whitespace to a single space.
pub fn normalize_input(input: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("regex is valid"));
    re.replace_all(input.trim(), " ").to_lowercase()
}

/// Match `input` against `choices` (label → value) after normalisation.
///
/// Labels are compared case-insensitively; on mismatch the error lists every
/// label so the caller can re-prompt.
pub fn validate<T: Copy>(input: &str, kind: &'static str, choices: &[(&str, T)]) -> Result<T> {
    let wanted = normalize_input(input);
    choices
        .iter()
        .find(|(label, _)| label.to_lowercase() == wanted)
        .map(|&(_, value)| value)
        .ok_or_else(|| BikeshareError::InvalidSelection {
            kind,
            value: input.trim().to_string(),
            expected: describe_choices(choices),
        })
}

/// Validate a city name.
pub fn parse_city(input: &str) -> Result<City> {
    let choices: Vec<(&str, City)> = City::ALL.iter().map(|c| (c.display_name(), *c)).collect();
    validate(input, "city", &choices)
}

/// Validate a month selector (`all` or January–June).
pub fn parse_month_selector(input: &str) -> Result<Selector<Month>> {
    let mut choices: Vec<(&str, Selector<Month>)> = Month::ALL
        .iter()
        .map(|m| (m.name(), Selector::Only(*m)))
        .collect();
    choices.push(("All", Selector::All));
    validate(input, "month", &choices)
}

/// Validate a weekday selector (`all` or Monday–Sunday).
pub fn parse_day_selector(input: &str) -> Result<Selector<Weekday>> {
    let mut choices: Vec<(&str, Selector<Weekday>)> = WEEKDAYS
        .iter()
        .map(|d| (weekday_name(*d), Selector::Only(*d)))
        .collect();
    choices.push(("All", Selector::All));
    validate(input, "day of the week", &choices)
}

/// Validate a yes/no answer. Accepts `y`/`n` shorthands.
pub fn parse_yes_no(input: &str) -> Result<bool> {
    validate(
        input,
        "answer",
        &[("Yes", true), ("No", false), ("y", true), ("n", false)],
    )
}

/// `"A, B or C"` rendering of the choice labels.
fn describe_choices<T>(choices: &[(&str, T)]) -> String {
    let labels: Vec<&str> = choices.iter().map(|(label, _)| *label).collect();
    match labels.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}
