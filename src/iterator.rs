use std::iter::FusedIterator;

use chrono::NaiveDateTime;

use crate::{schedule::Schedule, time_source::TimeSource, Direction};

/// Iterator over successive occurrences of a [`Schedule`], created by
/// [`Schedule::iter_after`] or [`Schedule::iter_before`].
///
/// Each step searches from the previous occurrence. The iterator ends for good once a
/// search fails, which only happens for expressions with no occurrence in reach.
pub struct CronIterator<'a, S>
where
    S: TimeSource,
{
    schedule: &'a Schedule<S>,
    current_time: NaiveDateTime,
    current_instant: S::Instant,
    direction: Direction,
    finished: bool,
}

impl<'a, S> CronIterator<'a, S>
where
    S: TimeSource,
{
    /// Creates a new `CronIterator`.
    ///
    /// # Arguments
    ///
    /// * `schedule` - The schedule to walk.
    /// * `start` - Instant to start from, never yielded itself.
    /// * `direction` - The direction to iterate in (Forward or Backward).
    pub(crate) fn new(schedule: &'a Schedule<S>, start: S::Instant, direction: Direction) -> Self {
        CronIterator {
            schedule,
            current_time: schedule.time_source().to_local(&start),
            current_instant: start,
            direction,
            finished: false,
        }
    }
}

impl<S> Iterator for CronIterator<'_, S>
where
    S: TimeSource,
{
    type Item = S::Instant;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let dom_and_dow = self.schedule.cron().pattern.dom_and_dow;
        match self.schedule.resolve(
            &self.current_time,
            &self.current_instant,
            self.direction,
            dom_and_dow,
        ) {
            Ok((found_time, instant)) => {
                self.current_time = found_time;
                self.current_instant = instant.clone();
                Some(instant)
            }
            Err(e) => {
                tracing::debug!(error = %e, direction = ?self.direction, "cron iterator finished");
                self.finished = true;
                None
            }
        }
    }
}

impl<S> FusedIterator for CronIterator<'_, S> where S: TimeSource {}
