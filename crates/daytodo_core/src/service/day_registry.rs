//! Day registry service.
//!
//! # Invariants
//! - `find_or_create` is idempotent: repeated calls for one day key yield the
//!   same container and never a duplicate row.
//! - Creation costs exactly one store write.

use crate::model::day::{DayContainer, DayKey};
use crate::repo::day_repo::DayRepository;
use crate::repo::{StoreError, StoreResult};
use log::info;

/// Find-or-create access to per-day containers.
pub struct DayRegistry<R: DayRepository> {
    repo: R,
}

impl<R: DayRepository> DayRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Read-only lookup by exact day key.
    pub fn find(&self, day: &DayKey) -> StoreResult<Option<DayContainer>> {
        self.repo.find_day(day)
    }

    /// Returns the container for `day`, creating an empty one when absent.
    pub fn find_or_create(&self, day: &DayKey) -> StoreResult<DayContainer> {
        if let Some(container) = self.repo.find_day(day)? {
            return Ok(container);
        }

        if self.repo.insert_day(day)? {
            info!("event=day_create module=service status=ok");
        }

        self.repo
            .find_day(day)?
            .ok_or(StoreError::InconsistentState(
                "created day not found in read-back",
            ))
    }
}
