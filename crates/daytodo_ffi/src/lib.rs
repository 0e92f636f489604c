//! Flutter-facing bindings for the daily task core.

pub mod api;
