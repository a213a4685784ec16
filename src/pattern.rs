use std::fmt;

use crate::component::{FieldKind, FieldSet};

// This struct holds a parsed cron expression: one resolved set per field, plus how the two
// day fields are combined. It is immutable once built by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CronPattern {
    pattern: String, // The expression text after macro expansion
    //
    pub minutes: FieldSet,      // -
    pub hours: FieldSet,        // --- Each field of the expression
    pub days: FieldSet,         // --- resolved to its allowed values
    pub months: FieldSet,       // --
    pub days_of_week: FieldSet, // -

    // Setting to alter how days and days_of_week are combined when both are restricted
    pub dom_and_dow: bool,
}

impl CronPattern {
    pub(crate) fn new(pattern: String, fields: [FieldSet; 5], dom_and_dow: bool) -> Self {
        let [minutes, hours, days, months, days_of_week] = fields;
        debug_assert!(minutes.kind().is_minute() && days_of_week.kind().is_day_of_week());
        Self {
            pattern,
            minutes,
            hours,
            days,
            months,
            days_of_week,
            dom_and_dow,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The set for one field.
    pub fn field(&self, kind: FieldKind) -> &FieldSet {
        match kind {
            FieldKind::Minute => &self.minutes,
            FieldKind::Hour => &self.hours,
            FieldKind::DayOfMonth => &self.days,
            FieldKind::Month => &self.months,
            FieldKind::DayOfWeek => &self.days_of_week,
        }
    }

    pub fn minute_match(&self, minute: u32) -> bool {
        self.minutes.contains(minute)
    }

    pub fn hour_match(&self, hour: u32) -> bool {
        self.hours.contains(hour)
    }

    pub fn month_match(&self, month: u32) -> bool {
        self.months.contains(month)
    }

    /// Checks a calendar day against both day fields, combined the way this pattern
    /// was parsed.
    ///
    /// `weekday` counts from Sunday = 0.
    pub fn day_match(&self, day: u32, weekday: u32) -> bool {
        self.day_match_with(day, weekday, self.dom_and_dow)
    }

    /// Checks a calendar day against both day fields with an explicit combinator.
    ///
    /// A field covering its whole range does not restrict anything, so the other field
    /// decides alone. When both are restricted, `dom_and_dow` selects between the
    /// traditional OR ("the 13th or any Friday") and AND ("only Friday the 13th").
    pub fn day_match_with(&self, day: u32, weekday: u32, dom_and_dow: bool) -> bool {
        let day_matches = self.days.contains(day);
        let dow_matches = self.days_of_week.contains(weekday);

        match (self.days.is_full(), self.days_of_week.is_full()) {
            (true, true) => true,
            (true, false) => dow_matches,
            (false, true) => day_matches,
            (false, false) => {
                let combine: fn(bool, bool) -> bool = if dom_and_dow {
                    |a, b| a && b
                } else {
                    |a, b| a || b
                };
                combine(day_matches, dow_matches)
            }
        }
    }
}

impl fmt::Display for CronPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pattern(days: &str, days_of_week: &str, dom_and_dow: bool) -> CronPattern {
        CronPattern::new(
            format!("0 0 {days} * {days_of_week}"),
            [
                FieldSet::parse(FieldKind::Minute, "0").unwrap(),
                FieldSet::parse(FieldKind::Hour, "0").unwrap(),
                FieldSet::parse(FieldKind::DayOfMonth, days).unwrap(),
                FieldSet::full(FieldKind::Month),
                FieldSet::parse(FieldKind::DayOfWeek, days_of_week).unwrap(),
            ],
            dom_and_dow,
        )
    }

    // Weekdays: 0 = Sunday, 5 = Friday
    #[rstest]
    #[case("*", "*", 1, 2, true)]
    #[case("13", "*", 13, 2, true)]
    #[case("13", "*", 14, 5, false)]
    #[case("*", "5", 14, 5, true)]
    #[case("*", "5", 13, 2, false)]
    #[case("13", "5", 13, 2, true)]
    #[case("13", "5", 6, 5, true)]
    #[case("13", "5", 13, 5, true)]
    #[case("13", "5", 6, 2, false)]
    fn test_day_match_permissive(
        #[case] days: &str,
        #[case] days_of_week: &str,
        #[case] day: u32,
        #[case] weekday: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(pattern(days, days_of_week, false).day_match(day, weekday), expected);
    }

    #[rstest]
    #[case("*", "*", 1, 2, true)]
    #[case("13", "*", 13, 2, true)]
    #[case("*", "5", 14, 5, true)]
    #[case("13", "5", 13, 2, false)]
    #[case("13", "5", 6, 5, false)]
    #[case("13", "5", 13, 5, true)]
    fn test_day_match_strict(
        #[case] days: &str,
        #[case] days_of_week: &str,
        #[case] day: u32,
        #[case] weekday: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(pattern(days, days_of_week, true).day_match(day, weekday), expected);
    }

    #[test]
    fn test_explicit_full_range_counts_as_unrestricted() {
        // 1-31 covers the whole field, so only the weekday decides
        let cron = pattern("1-31", "5", false);
        assert!(cron.day_match(6, 5));
        assert!(!cron.day_match(13, 2));

        let cron = pattern("13", "0-6", true);
        assert!(cron.day_match(13, 2));
    }

    #[test]
    fn test_override_combinator() {
        let cron = pattern("13", "5", false);
        assert!(cron.day_match_with(6, 5, false));
        assert!(!cron.day_match_with(6, 5, true));
    }

    #[test]
    fn test_field_accessors() {
        let cron = pattern("13", "5", false);
        assert_eq!(cron.field(FieldKind::DayOfMonth), &cron.days);
        assert!(cron.minute_match(0));
        assert!(!cron.hour_match(1));
        assert!(cron.month_match(12));
        assert_eq!(cron.to_string(), "0 0 13 * 5");
        assert_eq!(cron.as_str(), "0 0 13 * 5");
    }
}
