//! Read path for the day screen.
//!
//! Recomputed on every call; nothing is cached between reads and nothing is
//! ever created here.

use crate::calendar::{CalendarError, Clock, DayCalendar};
use crate::model::day::DayKey;
use crate::model::task::Task;
use crate::repo::day_repo::DayRepository;
use crate::repo::{StoreError, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while resolving the day screen.
#[derive(Debug)]
pub enum DayViewError {
    Calendar(CalendarError),
    Store(StoreError),
}

impl Display for DayViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DayViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Calendar(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<CalendarError> for DayViewError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<StoreError> for DayViewError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Sorted task listing for one calendar day.
pub struct DayView<R: DayRepository, C: Clock> {
    repo: R,
    calendar: DayCalendar,
    clock: C,
}

impl<R: DayRepository, C: Clock> DayView<R, C> {
    pub fn new(repo: R, calendar: DayCalendar, clock: C) -> Self {
        Self {
            repo,
            calendar,
            clock,
        }
    }

    pub fn calendar(&self) -> &DayCalendar {
        &self.calendar
    }

    /// Day key for the clock's current instant.
    pub fn today(&self) -> Result<DayKey, DayViewError> {
        Ok(self.calendar.day_key(self.clock.now_epoch_ms())?)
    }

    /// Today's tasks ordered by start time; empty when no container exists.
    pub fn tasks_for_today(&self) -> Result<Vec<Task>, DayViewError> {
        let today = self.today()?;
        Ok(self.tasks_for_day(&today)?)
    }

    /// Tasks of `day` ordered by start time, ties in insertion order.
    pub fn tasks_for_day(&self, day: &DayKey) -> StoreResult<Vec<Task>> {
        Ok(self
            .repo
            .find_day(day)?
            .map(|container| container.tasks_by_start())
            .unwrap_or_default())
    }
}
