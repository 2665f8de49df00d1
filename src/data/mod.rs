//! Data sources that do not come from disk.
//!
//! Currently only a seeded synthetic generator used by the `generate_sample`
//! binary and by tests.

pub mod synthetic;
