//! `nmplot` library crate.
//!
//! The binary (`nmplot`) is a thin wrapper around this library so that:
//!
//! - loading, selection and figure building are testable without spawning processes
//! - the synthetic sample generator can share the same readers and writers
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
