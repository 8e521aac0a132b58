//! Shared repository utilities

pub mod retry;
