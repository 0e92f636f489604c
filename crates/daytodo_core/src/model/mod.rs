//! Day/task domain model.
//!
//! # Responsibility
//! - Define the per-day container record and the tasks it owns.
//! - Hold the write-time invariants every persisted task must satisfy.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Every task belongs to exactly one day container.
//! - Deletion is a hard delete; there are no tombstones.

pub mod day;
pub mod task;
