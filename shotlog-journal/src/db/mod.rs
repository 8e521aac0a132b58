//! Per-entity SQL query functions
//!
//! Thin, untraced functions over `&SqlitePool`. Policy (validation,
//! uniqueness, retries, events) lives in `repo`; these modules only bind
//! parameters and map rows.

pub mod basket_configs;
pub mod beans;
pub mod grind_recommendations;
pub mod grinder_configs;
pub mod shot_recommendations;
pub mod shots;
