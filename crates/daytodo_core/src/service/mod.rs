//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the day/task use-cases.
//! - Keep FFI and CLI callers decoupled from storage details.

pub mod day_registry;
pub mod day_view;
pub mod entry_flow;
pub mod task_store;
