use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// The capability a [`Schedule`](crate::Schedule) uses to turn wall-clock fields into
/// instants, and reference instants back into wall-clock fields.
///
/// Every chrono [`TimeZone`] (`Utc`, `FixedOffset`, `Local`, `chrono_tz::Tz`, ...) is a
/// time source producing `DateTime<Tz>`. [`Naive`] produces zone-less
/// [`NaiveDateTime`]s. Implement it yourself to plug in a different instant type or to
/// observe how instants are built.
///
/// The occurrence search never calls [`TimeSource::local`] for intermediate candidates,
/// only once for each result it hands back. Instants must be ordered so results can be
/// kept strictly after (or before) the reference instant.
pub trait TimeSource {
    type Instant: Clone + Ord;

    /// Builds an instant from local wall-clock fields.
    ///
    /// Returns `None` when the fields do not name an existing local time, for example a
    /// time skipped by a daylight saving transition. Ambiguous times should resolve to
    /// the earliest instant.
    fn local(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self::Instant>;

    /// Builds the latest instant for local wall-clock fields that occur more than once,
    /// such as the hour repeated when clocks are turned back.
    ///
    /// Only asked for when the earliest instant lands on the wrong side of the reference.
    /// The default has no second reading.
    fn local_later(
        &self,
        _year: i32,
        _month: u32,
        _day: u32,
        _hour: u32,
        _minute: u32,
        _second: u32,
    ) -> Option<Self::Instant> {
        None
    }

    /// Breaks an instant down into local wall-clock fields.
    fn to_local(&self, instant: &Self::Instant) -> NaiveDateTime;
}

impl<Tz: TimeZone> TimeSource for Tz {
    type Instant = DateTime<Tz>;

    fn local(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<DateTime<Tz>> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        self.from_local_datetime(&naive).earliest()
    }

    fn local_later(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<DateTime<Tz>> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        self.from_local_datetime(&naive).latest()
    }

    fn to_local(&self, instant: &DateTime<Tz>) -> NaiveDateTime {
        instant.with_timezone(self).naive_local()
    }
}

/// Time source for zone-less wall-clock times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Naive;

impl TimeSource for Naive {
    type Instant = NaiveDateTime;

    fn local(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
    }

    fn to_local(&self, instant: &NaiveDateTime) -> NaiveDateTime {
        *instant
    }
}
