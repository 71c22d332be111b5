//! Test utilities for hackreg crates.
//!
//! Provides registration fixtures shared by service and client tests.
//! Import in `#[cfg(test)]` blocks and `tests/` only, never in production code.

pub mod fixture;
