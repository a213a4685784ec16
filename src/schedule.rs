use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::{
    errors::CronError, iterator::CronIterator, parser::CronParser, time_source::TimeSource, Cron,
    Direction,
};

// A time zone can skip a whole calendar day, so allow that many unrepresentable candidates
// in a row before giving up.
const MAX_SKIPPED_CANDIDATES: u32 = 24 * 60;

/// A parsed cron expression bound to the [`TimeSource`] that builds its result instants.
///
/// Constructing a schedule parses the expression right away, so malformed input is
/// rejected here rather than at the first query. Queries take `&self` and keep no state
/// between calls, a schedule can be shared freely between threads when its time source
/// allows it.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cronline::Schedule;
///
/// let schedule = Schedule::new("*/15 * * * *", Utc).unwrap();
/// let from = Utc.with_ymd_and_hms(2011, 8, 15, 2, 2, 0).unwrap();
///
/// assert_eq!(
///     schedule.next(&from).unwrap(),
///     Utc.with_ymd_and_hms(2011, 8, 15, 2, 15, 0).unwrap()
/// );
/// assert_eq!(
///     schedule.previous(&from).unwrap(),
///     Utc.with_ymd_and_hms(2011, 8, 15, 2, 0, 0).unwrap()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Schedule<S: TimeSource> {
    cron: Cron,
    source: S,
}

impl<S: TimeSource> Schedule<S> {
    /// Parses `pattern` with the default, permissive parser.
    pub fn new(pattern: &str, source: S) -> Result<Self, CronError> {
        Self::with_parser(pattern, &CronParser::new(), source)
    }

    /// Parses `pattern` with a custom parser, for example one built with
    /// `CronParser::builder().dom_and_dow(true)`.
    pub fn with_parser(pattern: &str, parser: &CronParser, source: S) -> Result<Self, CronError> {
        Ok(Self::from_cron(parser.parse(pattern)?, source))
    }

    pub fn from_cron(cron: Cron, source: S) -> Self {
        Self { cron, source }
    }

    pub fn cron(&self) -> &Cron {
        &self.cron
    }

    pub fn time_source(&self) -> &S {
        &self.source
    }

    /// Checks whether `instant` falls on a minute matched by the expression.
    pub fn is_match(&self, instant: &S::Instant) -> bool {
        self.cron.is_time_matching(&self.source.to_local(instant))
    }

    /// The first occurrence strictly after `from`.
    pub fn next(&self, from: &S::Instant) -> Result<S::Instant, CronError> {
        self.next_with_mode(from, self.cron.pattern.dom_and_dow)
    }

    /// Like [`Schedule::next`], but combines the day fields with AND when `dom_and_dow`
    /// is set and with OR otherwise, whatever the expression was parsed with.
    pub fn next_with_mode(
        &self,
        from: &S::Instant,
        dom_and_dow: bool,
    ) -> Result<S::Instant, CronError> {
        let local = self.source.to_local(from);
        self.resolve(&local, from, Direction::Forward, dom_and_dow)
            .map(|(_, instant)| instant)
    }

    /// The next `count` occurrences after `from`, in chronological order.
    ///
    /// Either all `count` instants are found or the whole call fails.
    pub fn next_n(&self, from: &S::Instant, count: usize) -> Result<Vec<S::Instant>, CronError> {
        self.collect(from, count, Direction::Forward)
    }

    /// The last occurrence strictly before `from`.
    pub fn previous(&self, from: &S::Instant) -> Result<S::Instant, CronError> {
        self.previous_with_mode(from, self.cron.pattern.dom_and_dow)
    }

    /// Like [`Schedule::previous`] with an explicit day-field combinator.
    pub fn previous_with_mode(
        &self,
        from: &S::Instant,
        dom_and_dow: bool,
    ) -> Result<S::Instant, CronError> {
        let local = self.source.to_local(from);
        self.resolve(&local, from, Direction::Backward, dom_and_dow)
            .map(|(_, instant)| instant)
    }

    /// The `count` occurrences before `from`, most recent first.
    pub fn previous_n(
        &self,
        from: &S::Instant,
        count: usize,
    ) -> Result<Vec<S::Instant>, CronError> {
        self.collect(from, count, Direction::Backward)
    }

    /// A lazy iterator over the occurrences after `from`.
    pub fn iter_after(&self, from: &S::Instant) -> CronIterator<'_, S> {
        CronIterator::new(self, from.clone(), Direction::Forward)
    }

    /// A lazy iterator over the occurrences before `from`, walking back in time.
    pub fn iter_before(&self, from: &S::Instant) -> CronIterator<'_, S> {
        CronIterator::new(self, from.clone(), Direction::Backward)
    }

    fn collect(
        &self,
        from: &S::Instant,
        count: usize,
        direction: Direction,
    ) -> Result<Vec<S::Instant>, CronError> {
        let mut current = self.source.to_local(from);
        let mut reference = from.clone();
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            let (found, instant) =
                self.resolve(&current, &reference, direction, self.cron.pattern.dom_and_dow)?;
            results.push(instant.clone());
            current = found;
            reference = instant;
        }
        Ok(results)
    }

    // Finds the nearest occurrence past `reference` and builds its instant. `from` is the
    // wall-clock reading of `reference`. Wall-clock times the source cannot represent, or
    // whose instants fall on the wrong side of `reference`, are skipped.
    pub(crate) fn resolve(
        &self,
        from: &NaiveDateTime,
        reference: &S::Instant,
        direction: Direction,
        dom_and_dow: bool,
    ) -> Result<(NaiveDateTime, S::Instant), CronError> {
        let mut current = *from;
        for _ in 0..MAX_SKIPPED_CANDIDATES {
            let found = self.cron.find_occurrence(&current, direction, dom_and_dow)?;
            if let Some(instant) = self.instant_past(&found, reference, direction) {
                return Ok((found, instant));
            }
            tracing::trace!(candidate = ?found, "skipping local time with no usable instant");
            current = found;
        }

        tracing::debug!(
            pattern = %self.cron.pattern,
            ?from,
            "no representable occurrence near the reference time"
        );
        Err(CronError::NoOccurrenceFound)
    }

    // Builds the instant for `found` that lies strictly after (forward) or strictly before
    // (backward) `reference`. A repeated wall-clock time has two readings, the one closest
    // to `reference` wins.
    fn instant_past(
        &self,
        found: &NaiveDateTime,
        reference: &S::Instant,
        direction: Direction,
    ) -> Option<S::Instant> {
        let (year, month, day) = (found.year(), found.month(), found.day());
        let (hour, minute) = (found.hour(), found.minute());
        let earliest = self.source.local(year, month, day, hour, minute, 0)?;

        match direction {
            Direction::Forward if earliest > *reference => Some(earliest),
            Direction::Forward => self
                .source
                .local_later(year, month, day, hour, minute, 0)
                .filter(|later| later > reference),
            Direction::Backward if earliest < *reference => Some(
                self.source
                    .local_later(year, month, day, hour, minute, 0)
                    .filter(|later| later < reference)
                    .unwrap_or(earliest),
            ),
            Direction::Backward => None,
        }
    }
}
