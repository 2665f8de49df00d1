//! Input/output helpers.
//!
//! - SED grid read/write (`grid`)
//! - noise-model catalog read/write (`noise`)
//! - shared table helpers and format detection (`table`)

pub mod grid;
pub mod noise;
pub mod table;

pub use grid::*;
pub use noise::*;
pub use table::TableFormat;
