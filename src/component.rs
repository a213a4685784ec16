use strum::{Display, EnumIs, EnumIter};

use crate::errors::CronError;

// Name aliases, resolved before numeric parsing
const MONTH_NAMES: [(&str, u32); 12] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

const WEEKDAY_NAMES: [(&str, u32); 7] = [
    ("sun", 0),
    ("mon", 1),
    ("tue", 2),
    ("wed", 3),
    ("thu", 4),
    ("fri", 5),
    ("sat", 6),
];

/// The five positions of a cron expression, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumIs)]
pub enum FieldKind {
    #[strum(to_string = "minute")]
    Minute,
    #[strum(to_string = "hour")]
    Hour,
    #[strum(to_string = "day of month")]
    DayOfMonth,
    #[strum(to_string = "month")]
    Month,
    #[strum(to_string = "day of week")]
    DayOfWeek,
}

impl FieldKind {
    /// Lowest legal value.
    pub fn min(self) -> u32 {
        match self {
            FieldKind::DayOfMonth | FieldKind::Month => 1,
            _ => 0,
        }
    }

    /// Highest legal value.
    pub fn max(self) -> u32 {
        match self {
            FieldKind::Minute => 59,
            FieldKind::Hour => 23,
            FieldKind::DayOfMonth => 31,
            FieldKind::Month => 12,
            FieldKind::DayOfWeek => 6,
        }
    }

    // Day of week accepts 7 as Sunday; it is folded to 0 on insert.
    fn max_literal(self) -> u32 {
        match self {
            FieldKind::DayOfWeek => 7,
            other => other.max(),
        }
    }

    fn names(self) -> &'static [(&'static str, u32)] {
        match self {
            FieldKind::Month => &MONTH_NAMES,
            FieldKind::DayOfWeek => &WEEKDAY_NAMES,
            _ => &[],
        }
    }
}

/// The resolved set of allowed values for one field of a cron expression.
///
/// Values are kept in a 64-bit mask, so membership and the neighbour queries used by
/// the occurrence search are constant time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSet {
    kind: FieldKind,
    bits: u64,
}

impl FieldSet {
    fn empty(kind: FieldKind) -> Self {
        Self { kind, bits: 0 }
    }

    /// A set holding every legal value of `kind`, which is what `*` resolves to.
    pub fn full(kind: FieldKind) -> Self {
        let mut set = Self::empty(kind);
        for value in kind.min()..=kind.max() {
            set.bits |= 1 << value;
        }
        set
    }

    /// Parses one field token, such as `*/15`, `1-5`, `mon,wed` or `10-40/10`.
    ///
    /// The token is split on `,` and every element is resolved on its own, the
    /// resulting values are unioned. Any element that is empty, malformed or out of
    /// the field's range makes the whole token invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use cronline::{FieldKind, FieldSet};
    ///
    /// let set = FieldSet::parse(FieldKind::Minute, "10-40/10").unwrap();
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![10, 20, 30, 40]);
    /// ```
    pub fn parse(kind: FieldKind, field: &str) -> Result<Self, CronError> {
        let mut set = Self::empty(kind);
        for element in field.split(',') {
            set.parse_element(element.trim())?;
        }
        Ok(set)
    }

    fn parse_element(&mut self, element: &str) -> Result<(), CronError> {
        let kind = self.kind;
        if element.is_empty() {
            return Err(CronError::invalid(format!("{kind}: empty list element")));
        }

        let (range_part, step) = match element.split_once('/') {
            Some((range_part, step)) => (range_part, Some(Self::parse_step(kind, step)?)),
            None => (element, None),
        };

        let (start, end) = if range_part == "*" {
            (kind.min(), kind.max())
        } else if let Some((first, last)) = range_part.split_once('-') {
            (Self::resolve(kind, first)?, Self::resolve(kind, last)?)
        } else {
            let single = Self::resolve(kind, range_part)?;
            match step {
                // `a/n` runs from `a` to the top of the field, a weekday of 7 starts at Sunday
                Some(_) if kind.is_day_of_week() && single == 7 => (0, kind.max()),
                Some(_) => (single, kind.max()),
                None => (single, single),
            }
        };

        if start > end {
            return Err(CronError::invalid(format!(
                "{kind}: range {start}-{end} is reversed in '{element}'"
            )));
        }

        for value in (start..=end).step_by(step.unwrap_or(1) as usize) {
            self.insert(value);
        }
        Ok(())
    }

    fn parse_step(kind: FieldKind, step: &str) -> Result<u32, CronError> {
        let parsed = if !step.is_empty() && step.bytes().all(|b| b.is_ascii_digit()) {
            step.parse::<u32>().ok()
        } else {
            None
        };
        match parsed {
            Some(0) => Err(CronError::invalid(format!("{kind}: step cannot be zero"))),
            Some(step) => Ok(step),
            None => Err(CronError::invalid(format!("{kind}: invalid step '{step}'"))),
        }
    }

    // Resolves a single value, either a name from the alias table or a number.
    fn resolve(kind: FieldKind, atom: &str) -> Result<u32, CronError> {
        if let Some(&(_, value)) = kind
            .names()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(atom))
        {
            return Ok(value);
        }

        if atom.is_empty() || !atom.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CronError::invalid(format!(
                "{kind}: '{atom}' is not a number or a known name"
            )));
        }

        let value = atom
            .parse::<u32>()
            .map_err(|_| CronError::invalid(format!("{kind}: '{atom}' is out of range")))?;
        if value < kind.min() || value > kind.max_literal() {
            return Err(CronError::invalid(format!(
                "{kind}: {value} is out of range ({}-{})",
                kind.min(),
                kind.max_literal()
            )));
        }
        Ok(value)
    }

    fn insert(&mut self, value: u32) {
        let value = if self.kind == FieldKind::DayOfWeek && value == 7 {
            0
        } else {
            value
        };
        self.bits |= 1 << value;
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn contains(&self, value: u32) -> bool {
        value < 64 && self.bits & (1 << value) != 0
    }

    /// True when the set covers the whole legal range, as `*` does.
    pub fn is_full(&self) -> bool {
        *self == Self::full(self.kind)
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Smallest member. Parsed sets are never empty.
    pub fn first(&self) -> u32 {
        self.bits.trailing_zeros()
    }

    /// Largest member. Parsed sets are never empty.
    pub fn last(&self) -> u32 {
        63 - self.bits.leading_zeros()
    }

    /// Smallest member that is `>= value`.
    pub fn next_from(&self, value: u32) -> Option<u32> {
        if value > 63 {
            return None;
        }
        let masked = self.bits & (u64::MAX << value);
        (masked != 0).then(|| masked.trailing_zeros())
    }

    /// Largest member that is `<= value`.
    pub fn prev_from(&self, value: u32) -> Option<u32> {
        let mask = if value >= 63 {
            u64::MAX
        } else {
            (1 << (value + 1)) - 1
        };
        let masked = self.bits & mask;
        (masked != 0).then(|| 63 - masked.leading_zeros())
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        let set = *self;
        (set.kind.min()..=set.kind.max()).filter(move |value| set.contains(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn values(kind: FieldKind, field: &str) -> Vec<u32> {
        FieldSet::parse(kind, field).unwrap().iter().collect()
    }

    #[rstest]
    #[case("*", (0..=59).collect())]
    #[case("*/10", vec![0, 10, 20, 30, 40, 50])]
    #[case("10", vec![10])]
    #[case("10,30", vec![10, 30])]
    #[case("10-15", vec![10, 11, 12, 13, 14, 15])]
    #[case("10-40/10", vec![10, 20, 30, 40])]
    #[case("50/5", vec![50, 55])]
    #[case("1-9/3,15-30/4", vec![1, 4, 7, 15, 19, 23, 27])]
    fn test_parse_minute_elements(#[case] field: &str, #[case] expected: Vec<u32>) {
        assert_eq!(values(FieldKind::Minute, field), expected);
    }

    #[test]
    fn test_step_from_star_starts_at_field_minimum() {
        assert_eq!(values(FieldKind::DayOfMonth, "*/10"), vec![1, 11, 21, 31]);
        assert_eq!(values(FieldKind::Month, "*/5"), vec![1, 6, 11]);
        assert_eq!(values(FieldKind::DayOfWeek, "*/2"), vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(values(FieldKind::DayOfWeek, "mOn,WED"), vec![1, 3]);
        assert_eq!(values(FieldKind::DayOfWeek, "mon,wed"), values(FieldKind::DayOfWeek, "1,3"));
        assert_eq!(values(FieldKind::Month, "May,JUL"), vec![5, 7]);
        assert_eq!(values(FieldKind::Month, "jan-mar"), vec![1, 2, 3]);
        assert_eq!(values(FieldKind::DayOfWeek, "1-fri"), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_names_only_apply_to_their_field() {
        assert!(FieldSet::parse(FieldKind::DayOfWeek, "jan").is_err());
        assert!(FieldSet::parse(FieldKind::Month, "mon").is_err());
        assert!(FieldSet::parse(FieldKind::Hour, "mon").is_err());
    }

    #[test]
    fn test_day_of_week_seven_is_sunday() {
        assert_eq!(values(FieldKind::DayOfWeek, "7"), vec![0]);
        assert_eq!(values(FieldKind::DayOfWeek, "5-7"), vec![0, 5, 6]);
        assert!(FieldSet::parse(FieldKind::DayOfWeek, "0-7").unwrap().is_full());
        assert!(FieldSet::parse(FieldKind::DayOfWeek, "8").is_err());
    }

    #[test]
    fn test_day_of_week_seven_with_step_starts_at_sunday() {
        assert_eq!(values(FieldKind::DayOfWeek, "7/2"), vec![0, 2, 4, 6]);
        assert_eq!(values(FieldKind::DayOfWeek, "7/3"), values(FieldKind::DayOfWeek, "0/3"));
        assert_eq!(values(FieldKind::DayOfWeek, "sun/3"), vec![0, 3, 6]);
    }

    #[rstest]
    #[case(FieldKind::DayOfWeek, "8", "day of week: 8 is out of range (0-7)")]
    #[case(FieldKind::Minute, "60", "minute: 60 is out of range (0-59)")]
    #[case(FieldKind::Month, "0", "month: 0 is out of range (1-12)")]
    fn test_out_of_range_message(
        #[case] kind: FieldKind,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        assert_eq!(
            FieldSet::parse(kind, field),
            Err(CronError::InvalidExpression(message.to_string()))
        );
    }

    #[rstest]
    #[case(FieldKind::Minute, "60")]
    #[case(FieldKind::Hour, "24")]
    #[case(FieldKind::DayOfMonth, "0")]
    #[case(FieldKind::DayOfMonth, "32")]
    #[case(FieldKind::Month, "13")]
    #[case(FieldKind::Minute, "10-")]
    #[case(FieldKind::Minute, "*/")]
    #[case(FieldKind::Minute, "*/0")]
    #[case(FieldKind::Minute, "*/x")]
    #[case(FieldKind::Minute, "15-10")]
    #[case(FieldKind::Minute, "1,,2")]
    #[case(FieldKind::Minute, "")]
    #[case(FieldKind::Minute, "-1")]
    #[case(FieldKind::Minute, "+5")]
    #[case(FieldKind::Minute, "99999999999")]
    #[case(FieldKind::Minute, "1-2-3")]
    fn test_parse_invalid(#[case] kind: FieldKind, #[case] field: &str) {
        assert!(matches!(
            FieldSet::parse(kind, field),
            Err(CronError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_full_sets() {
        for kind in FieldKind::iter() {
            let star = FieldSet::parse(kind, "*").unwrap();
            assert!(star.is_full());
            assert_eq!(star, FieldSet::full(kind));
            assert_eq!(star.first(), kind.min());
            assert_eq!(star.last(), kind.max());
        }
        assert!(FieldSet::parse(FieldKind::DayOfMonth, "1-31").unwrap().is_full());
        assert!(!FieldSet::parse(FieldKind::DayOfMonth, "1-30").unwrap().is_full());
    }

    #[test]
    fn test_neighbour_queries() {
        let set = FieldSet::parse(FieldKind::Minute, "15-59/15").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.first(), 15);
        assert_eq!(set.last(), 45);
        assert_eq!(set.next_from(0), Some(15));
        assert_eq!(set.next_from(15), Some(15));
        assert_eq!(set.next_from(16), Some(30));
        assert_eq!(set.next_from(46), None);
        assert_eq!(set.next_from(64), None);
        assert_eq!(set.prev_from(59), Some(45));
        assert_eq!(set.prev_from(30), Some(30));
        assert_eq!(set.prev_from(29), Some(15));
        assert_eq!(set.prev_from(14), None);
        assert_eq!(set.prev_from(100), Some(45));
    }

    #[test]
    fn test_contains() {
        let set = FieldSet::parse(FieldKind::Hour, "3,6,9").unwrap();
        assert!(set.contains(6));
        assert!(!set.contains(7));
        assert!(!set.contains(64));
        assert_eq!(set.kind(), FieldKind::Hour);
    }
}
