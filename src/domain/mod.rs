//! Domain types used throughout the plotter.
//!
//! This module defines:
//!
//! - the loaded inputs (`SedGrid`, `NoiseModel`)
//! - the figure rows (`Quantity`)
//! - run configuration (`PlotConfig`, `FigureStyle`)

pub mod types;

pub use types::*;
