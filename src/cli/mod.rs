//! Command-line parsing for the noise-model plotter.
//!
//! Parsing is kept apart from loading and drawing; `app` turns the parsed
//! arguments into a `PlotConfig`.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{DEFAULT_COLORS, DEFAULT_STRIDE, FigureStyle, MAX_FONT_SIZE};

/// Plot bias, error and completeness of noise models against SED flux.
#[derive(Debug, Parser)]
#[command(name = "nmplot", version, about = "Plot noise model diagnostics for an SED grid")]
pub struct Cli {
    /// SED grid file (.csv or .json).
    #[arg(value_name = "SED_FILE")]
    pub sed_file: PathBuf,

    /// Noise model file(s); each one is overplotted in every panel.
    #[arg(value_name = "NOISE_FILE", num_args = 1.., required = true)]
    pub noise_file_list: Vec<PathBuf>,

    /// Output image (.png, .jpg, .bmp or .svg).
    #[arg(value_name = "PLOT_FILE")]
    pub plot_file: PathBuf,

    /// Plot every Nth valid point.
    #[arg(long, default_value_t = DEFAULT_STRIDE as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub samp: u64,

    /// Colors to cycle through, one per noise model file.
    #[arg(long, num_args = 1.., default_values_t = DEFAULT_COLORS.map(String::from))]
    pub color: Vec<String>,

    /// Legend labels, one per noise model file.
    #[arg(long, num_args = 1..)]
    pub label: Option<Vec<String>>,

    /// Image width in pixels.
    #[arg(long, default_value_t = FigureStyle::default().width)]
    pub width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = FigureStyle::default().height)]
    pub height: u32,

    /// Font size for tick labels, axis titles and legends.
    #[arg(
        long,
        default_value_t = FigureStyle::default().font_size,
        value_parser = clap::value_parser!(u32).range(1..=MAX_FONT_SIZE as i64)
    )]
    pub font_size: u32,
}
