//! Parser for cron expressions.
//!
//! `cronline` uses [`CronParser`] to parse expressions. Invoking
//!
//! ```rust
//! # use std::str::FromStr as _;
//! #
//! # use cronline::{Cron, parser::CronParser};
//! #
//! Cron::from_str("*/5 * * * *");
//! ```
//!
//! is equivalent to
//!
//! ```rust
//! # use cronline::parser::CronParser;
//! #
//! CronParser::new().parse("*/5 * * * *");
//! ```
//!
//! You can customise the parser by creating a parser builder using
//! [`CronParser::builder`]. For example, to require both day fields to match
//! (strict mode) do something like this:
//!
//! ```rust
//! use cronline::parser::CronParser;
//!
//! let parser = CronParser::builder().dom_and_dow(true).build();
//!
//! // Only Friday the 13th
//! let cron = parser.parse("0 1 13 * FRI").unwrap();
//! assert!(cron.pattern.dom_and_dow);
//! ```

use derive_builder::Builder;

use crate::{
    component::{FieldKind, FieldSet},
    errors::CronError,
    pattern::CronPattern,
    Cron, DEFAULT_SEARCH_LIMIT,
};

/// Parser for cron expressions.
///
/// In order to build a custom cron parser use [`CronParser::builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Builder)]
#[builder(default, build_fn(skip), pattern = "owned")]
pub struct CronParser {
    /// Combine day of month and day of week with AND when both are restricted.
    dom_and_dow: bool,
    /// Maximum number of outer iterations a single occurrence search may take.
    search_limit: u32,
}

impl Default for CronParser {
    fn default() -> Self {
        Self {
            dom_and_dow: false,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl CronParser {
    /// Create a new parser with permissive day matching.
    ///
    /// You should probably be using [`Cron`]'s implementation of
    /// [`FromStr`][std::str::FromStr] instead of invoking this.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a builder for custom parsing.
    ///
    /// Equivalent to [`CronParserBuilder::default`].
    pub fn builder() -> CronParserBuilder {
        CronParserBuilder::default()
    }

    /// Parses the expression string.
    pub fn parse(&self, pattern: &str) -> Result<Cron, CronError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(CronError::invalid("expression is empty"));
        }

        // Handle @nicknames
        let expanded = if pattern.starts_with('@') {
            Self::handle_nicknames(pattern)?
        } else {
            pattern
        };

        let parts: Vec<&str> = expanded.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(CronError::invalid(format!(
                "expected 5 fields (minute hour day-of-month month day-of-week), found {}",
                parts.len()
            )));
        }

        let minutes = FieldSet::parse(FieldKind::Minute, parts[0])?;
        let hours = FieldSet::parse(FieldKind::Hour, parts[1])?;
        let days = FieldSet::parse(FieldKind::DayOfMonth, parts[2])?;
        let months = FieldSet::parse(FieldKind::Month, parts[3])?;
        let days_of_week = FieldSet::parse(FieldKind::DayOfWeek, parts[4])?;

        Ok(Cron {
            pattern: CronPattern::new(
                parts.join(" "),
                [minutes, hours, days, months, days_of_week],
                self.dom_and_dow,
            ),
            search_limit: self.search_limit,
        })
    }

    // Converts named shortcuts like '@daily' into their equivalent five-field expression.
    fn handle_nicknames(pattern: &str) -> Result<&'static str, CronError> {
        let eq_ignore_case = |a: &str, b: &str| a.eq_ignore_ascii_case(b);

        match pattern {
            p if eq_ignore_case(p, "@yearly") || eq_ignore_case(p, "@annually") => Ok("0 0 1 1 *"),
            p if eq_ignore_case(p, "@monthly") => Ok("0 0 1 * *"),
            p if eq_ignore_case(p, "@weekly") => Ok("0 0 * * 0"),
            p if eq_ignore_case(p, "@daily") || eq_ignore_case(p, "@midnight") => Ok("0 0 * * *"),
            p if eq_ignore_case(p, "@hourly") => Ok("0 * * * *"),
            p => Err(CronError::invalid(format!("unknown macro '{p}'"))),
        }
    }
}

impl CronParserBuilder {
    pub fn build(self) -> CronParser {
        let CronParserBuilder {
            dom_and_dow,
            search_limit,
        } = self;
        CronParser {
            dom_and_dow: dom_and_dow.unwrap_or_default(),
            search_limit: search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        }
    }
}
