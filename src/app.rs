//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves them into a `PlotConfig`
//! - runs the plot pipeline and reports what was drawn

use clap::Parser;
use log::info;

use crate::cli::Cli;
use crate::domain::{FigureStyle, PlotConfig};
use crate::error::AppError;

/// Entry point for the `nmplot` binary.
pub fn run() -> Result<(), AppError> {
    // With no arguments clap reports the missing positionals and usage.
    let cli = Cli::parse();
    let config = plot_config_from_args(&cli)?;

    let summary = crate::plot::render_noisemodel(&config)?;
    info!(
        "plotted {} catalog(s) x {} filter(s), {} points",
        summary.n_catalogs,
        summary.n_filters,
        summary.total_points()
    );

    Ok(())
}

pub fn plot_config_from_args(cli: &Cli) -> Result<PlotConfig, AppError> {
    let stride = usize::try_from(cli.samp)
        .map_err(|_| AppError::input(format!("`--samp {}` is too large for this platform.", cli.samp)))?;

    Ok(PlotConfig {
        sed_file: cli.sed_file.clone(),
        noise_files: cli.noise_file_list.clone(),
        plot_file: cli.plot_file.clone(),
        stride,
        colors: cli.color.clone(),
        labels: cli.label.clone(),
        style: FigureStyle {
            width: cli.width,
            height: cli.height,
            font_size: cli.font_size,
            ..FigureStyle::default()
        },
    })
}
