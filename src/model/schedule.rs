// src/model/schedule.rs

//! Date interval with a derived duration.
//!
//! A [`Schedule`] always satisfies `end == start + duration` (in days). Fields
//! are private; the only mutation path is [`Schedule::change`].

use chrono::{Days, NaiveDate};

use crate::errors::{CascadeError, Result};
use crate::types::Anchor;

/// A controlled change to a schedule.
///
/// - `Start(date)`: move the start, hold the end, recompute duration.
/// - `End(date)`: move the end, hold the start, recompute duration.
/// - `Duration(days)`: set the duration, hold the start, recompute end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleChange {
    Start(NaiveDate),
    End(NaiveDate),
    Duration(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    start: NaiveDate,
    end: NaiveDate,
    duration: i64,
}

impl Schedule {
    /// Build a schedule from both dates. `end` must not precede `start`;
    /// equal dates give a zero-length (milestone) schedule.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(CascadeError::InvalidInterval(format!(
                "end {end} is before start {start}"
            )));
        }
        Ok(Self {
            start,
            end,
            duration: (end - start).num_days(),
        })
    }

    /// Build a schedule from one date plus a duration.
    ///
    /// With `Anchor::Start` the duration extends forward from `date`; with
    /// `Anchor::End` it extends backward from it. Fails with
    /// [`CascadeError::InvalidInterval`] if the other end is not a
    /// representable date.
    pub fn anchored(date: NaiveDate, duration: u32, anchor: Anchor) -> Result<Self> {
        let days = Days::new(u64::from(duration));
        let (start, end) = match anchor {
            Anchor::Start => (Some(date), date.checked_add_days(days)),
            Anchor::End => (date.checked_sub_days(days), Some(date)),
        };
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self {
                start,
                end,
                duration: i64::from(duration),
            }),
            _ => Err(CascadeError::InvalidInterval(format!(
                "{duration} days from {anchor} {date} is out of range"
            ))),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Length in days.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Date at the given end of the interval.
    pub fn date_at(&self, anchor: Anchor) -> NaiveDate {
        match anchor {
            Anchor::Start => self.start,
            Anchor::End => self.end,
        }
    }

    /// Same duration, placed so that the `anchor` end sits on `date`.
    pub fn shifted_to(&self, date: NaiveDate, anchor: Anchor) -> Result<Self> {
        Self::anchored(date, self.duration_days(), anchor)
    }

    /// Apply a controlled change.
    ///
    /// Fails with [`CascadeError::InvalidInterval`] if the change would leave
    /// a zero or negative interval; the schedule is untouched in that case.
    pub fn change(&mut self, change: ScheduleChange) -> Result<()> {
        match change {
            ScheduleChange::Start(date) => {
                if date >= self.end {
                    return Err(CascadeError::InvalidInterval(format!(
                        "start {date} is not before end {}",
                        self.end
                    )));
                }
                self.start = date;
            }
            ScheduleChange::End(date) => {
                if date <= self.start {
                    return Err(CascadeError::InvalidInterval(format!(
                        "end {date} is not after start {}",
                        self.start
                    )));
                }
                self.end = date;
            }
            ScheduleChange::Duration(days) => {
                if days == 0 {
                    return Err(CascadeError::InvalidInterval(
                        "duration must be at least one day".to_string(),
                    ));
                }
                *self = Self::anchored(self.start, days, Anchor::Start)?;
                return Ok(());
            }
        }
        self.duration = (self.end - self.start).num_days();
        Ok(())
    }

    fn duration_days(&self) -> u32 {
        // Non-negative by construction.
        u32::try_from(self.duration).unwrap_or(u32::MAX)
    }
}
