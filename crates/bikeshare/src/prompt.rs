//! Line-oriented prompts over any reader/writer pair.
//!
//! Every question loops until the answer validates. An empty answer accepts
//! the offered default. End of input is reported as `None` so the caller can
//! wind down instead of spinning.

use std::io::{BufRead, Write};

use bikeshare_core::error::Result as CoreResult;
use bikeshare_core::models::{City, Month, Selection, Selector};
use bikeshare_core::selection::{parse_city, parse_day_selector, parse_month_selector, parse_yes_no};
use chrono::Weekday;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer the prompts go to, for printing between questions.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn ask_city(&mut self, default: Option<&str>) -> std::io::Result<Option<City>> {
        self.ask(
            "Would you like to see data for Chicago, New York City or Washington?",
            default,
            parse_city,
        )
    }

    pub fn ask_month(&mut self, default: Option<&str>) -> std::io::Result<Option<Selector<Month>>> {
        self.ask(
            "Which month (January, February, March, April, May, June) would you like to see data for? Type all for no filter.",
            default,
            parse_month_selector,
        )
    }

    pub fn ask_day(&mut self, default: Option<&str>) -> std::io::Result<Option<Selector<Weekday>>> {
        self.ask(
            "Which day of the week (Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday) would you like to see data for? Type all for no filter.",
            default,
            parse_day_selector,
        )
    }

    /// City, month and weekday in one go, each seeded with its default.
    pub fn ask_filters(
        &mut self,
        defaults: [Option<&str>; 3],
    ) -> std::io::Result<Option<(City, Selection)>> {
        let [city_default, month_default, day_default] = defaults;
        let Some(city) = self.ask_city(city_default)? else {
            return Ok(None);
        };
        let Some(month) = self.ask_month(month_default)? else {
            return Ok(None);
        };
        let Some(day) = self.ask_day(day_default)? else {
            return Ok(None);
        };
        Ok(Some((city, Selection::new(month, day))))
    }

    /// Yes/no question; end of input counts as "no".
    pub fn ask_yes_no(&mut self, question: &str) -> std::io::Result<bool> {
        let question = format!("{question} Type Yes or No.");
        Ok(self.ask(&question, None, parse_yes_no)?.unwrap_or(false))
    }

    fn ask<T>(
        &mut self,
        question: &str,
        default: Option<&str>,
        parse: impl Fn(&str) -> CoreResult<T>,
    ) -> std::io::Result<Option<T>> {
        loop {
            match default {
                Some(d) => writeln!(self.output, "\n{question} [{d}]")?,
                None => writeln!(self.output, "\n{question}")?,
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let answer = match (line.trim(), default) {
                ("", Some(d)) => d,
                (answer, _) => answer,
            };
            match parse(answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "\n{e}")?,
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
