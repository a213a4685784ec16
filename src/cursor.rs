use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::component::FieldSet;

/// A candidate wall-clock minute during an occurrence search.
///
/// The search moves this plain integer representation around and only turns it into a
/// real instant once it has settled on a match. Every carry method leaves the cursor
/// on a valid calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Cursor {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Cursor {
    pub fn from_naive(time: &NaiveDateTime) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
        }
    }

    /// Seconds are always zero.
    pub fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            0,
        )
    }

    /// Day of the week counted from Sunday = 0, or `None` outside chrono's calendar range.
    pub fn weekday(&self) -> Option<u32> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .map(|date| date.weekday().num_days_from_sunday())
    }

    // Forward carries. Lower fields reset to the smallest allowed value.

    pub fn next_month(&mut self, months: &FieldSet, hours: &FieldSet, minutes: &FieldSet) {
        match months.next_from(self.month + 1) {
            Some(month) => self.month = month,
            None => {
                self.year += 1;
                self.month = months.first();
            }
        }
        self.day = 1;
        self.hour = hours.first();
        self.minute = minutes.first();
    }

    pub fn next_day(&mut self, hours: &FieldSet, minutes: &FieldSet) {
        if self.day < days_in_month(self.year, self.month) {
            self.day += 1;
        } else if self.month < 12 {
            self.month += 1;
            self.day = 1;
        } else {
            self.year += 1;
            self.month = 1;
            self.day = 1;
        }
        self.hour = hours.first();
        self.minute = minutes.first();
    }

    pub fn next_hour(&mut self, hours: &FieldSet, minutes: &FieldSet) {
        if self.hour < 23 {
            self.hour += 1;
            self.minute = minutes.first();
        } else {
            self.next_day(hours, minutes);
        }
    }

    // Backward carries. Lower fields reset to the largest allowed value.

    pub fn prev_month(&mut self, months: &FieldSet, hours: &FieldSet, minutes: &FieldSet) {
        // Month sets never hold 0, so January finds nothing and wraps
        match months.prev_from(self.month - 1) {
            Some(month) => self.month = month,
            None => {
                self.year -= 1;
                self.month = months.last();
            }
        }
        self.day = days_in_month(self.year, self.month);
        self.hour = hours.last();
        self.minute = minutes.last();
    }

    pub fn prev_day(&mut self, hours: &FieldSet, minutes: &FieldSet) {
        if self.day > 1 {
            self.day -= 1;
        } else if self.month > 1 {
            self.month -= 1;
            self.day = days_in_month(self.year, self.month);
        } else {
            self.year -= 1;
            self.month = 12;
            self.day = 31;
        }
        self.hour = hours.last();
        self.minute = minutes.last();
    }

    pub fn prev_hour(&mut self, hours: &FieldSet, minutes: &FieldSet) {
        if self.hour > 0 {
            self.hour -= 1;
            self.minute = minutes.last();
        } else {
            self.prev_day(hours, minutes);
        }
    }
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}
