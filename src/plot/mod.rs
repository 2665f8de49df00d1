//! Noise-model diagnostic plot.
//!
//! Pipeline:
//! SED grid -> (per catalog) load, align, select + derive -> legends -> save.
//!
//! Nothing is written until every panel has been built, so any failure leaves
//! the output path untouched.

use log::{debug, info, warn};

use crate::domain::{PlotConfig, Quantity};
use crate::error::AppError;
use crate::io::{read_noise_model, read_sed_grid};

pub mod color;
pub mod figure;
pub mod render;
pub mod select;

pub use color::{ColorCycle, parse_color};
pub use figure::{CatalogStyle, Figure, LegendEntry, Panel, Series};
pub use render::{ImageFormat, save_figure};

/// What a completed run drew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub n_filters: usize,
    pub n_catalogs: usize,
    /// Points drawn per panel, row-major like `Figure::panels`.
    pub points_per_panel: Vec<usize>,
}

impl RenderSummary {
    fn from_figure(figure: &Figure) -> Self {
        Self {
            n_filters: figure.n_filters(),
            n_catalogs: figure.n_catalogs(),
            points_per_panel: figure.panels.iter().map(Panel::drawn_points).collect(),
        }
    }

    pub fn total_points(&self) -> usize {
        self.points_per_panel.iter().sum()
    }
}

/// Load the inputs named in `config` and build the figure model.
pub fn build_figure(config: &PlotConfig) -> Result<Figure, AppError> {
    config.validate()?;
    let colors = ColorCycle::parse(&config.colors)?;

    info!("reading SED grid file {}", config.sed_file.display());
    let grid = read_sed_grid(&config.sed_file)?;
    debug!("SED grid: {} objects x {} filters", grid.n_objects(), grid.n_filters());

    let mut figure = Figure::new(&grid.filters);
    for (n, path) in config.noise_files.iter().enumerate() {
        info!("reading {}", path.display());
        let model = read_noise_model(path)?;
        model.ensure_aligned(&grid).map_err(|e| {
            AppError::data(format!("{}: {}", path.display(), e.message()))
        })?;

        let style = CatalogStyle {
            color: colors.color_for(n),
            alpha: config.style.marker_alpha,
            label: config.labels.as_ref().map(|labels| labels[n].as_str()),
        };
        figure.add_catalog(&grid, &model, config.stride, &style);
    }

    // Legends go on once the last catalog is in.
    if config.labels.is_some() {
        figure.attach_legends();
        figure.finalize_legends();
    }

    for panel in &figure.panels {
        let drawn = panel.drawn_points();
        debug!(
            "panel {:?} / {}: {} points",
            panel.quantity, figure.filters[panel.filter], drawn
        );
        if drawn == 0 && panel.quantity == Quantity::Bias {
            warn!("no valid points for filter {}", figure.filters[panel.filter]);
        }
    }

    Ok(figure)
}

/// Render the diagnostic figure for `config` and save it to `config.plot_file`.
pub fn render_noisemodel(config: &PlotConfig) -> Result<RenderSummary, AppError> {
    // Reject an unusable output name before reading any input.
    ImageFormat::from_path(&config.plot_file)?;

    let figure = build_figure(config)?;
    save_figure(&figure, &config.style, &config.plot_file)?;
    info!("saved {}", config.plot_file.display());

    Ok(RenderSummary::from_figure(&figure))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use nalgebra::DMatrix;

    use super::*;
    use crate::domain::{FigureStyle, NoiseModel, SedGrid};
    use crate::io::{write_noise_model_csv, write_sed_grid_csv};

    fn small_style() -> FigureStyle {
        FigureStyle {
            width: 600,
            height: 400,
            ..FigureStyle::default()
        }
    }

    /// 1000 objects, 2 filters; errors 1.0 except objects 500..=509 set to -1.0.
    fn write_scenario(dir: &Path) -> (PathBuf, PathBuf) {
        let n = 1000;
        let grid = SedGrid::new(
            DMatrix::from_fn(n, 2, |i, f| 1e-18 * (1.0 + i as f64) * (f as f64 + 1.0)),
            vec!["F475W".to_string(), "F814W".to_string()],
        )
        .unwrap();
        let model = NoiseModel::new(
            DMatrix::from_fn(n, 2, |i, _| if (500..510).contains(&i) { -1.0 } else { 1.0 }),
            DMatrix::from_fn(n, 2, |i, _| 0.01 * i as f64),
            DMatrix::from_element(n, 2, 0.75),
        )
        .unwrap();

        let sed = dir.join("seds.csv");
        let noise = dir.join("noise.csv");
        write_sed_grid_csv(&sed, &grid).unwrap();
        write_noise_model_csv(&noise, &model).unwrap();
        (sed, noise)
    }

    #[test]
    fn end_to_end_png() {
        let dir = tempfile::tempdir().unwrap();
        let (sed, noise) = write_scenario(dir.path());
        let out = dir.path().join("plot.png");

        let mut config = PlotConfig::new(&sed, vec![noise], &out);
        config.style = small_style();
        let summary = render_noisemodel(&config).unwrap();

        assert_eq!(summary.n_filters, 2);
        assert_eq!(summary.n_catalogs, 1);
        // 990 valid objects, every 100th.
        assert_eq!(summary.points_per_panel, vec![10; 6]);
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn extrapolated_errors_never_selected() {
        let dir = tempfile::tempdir().unwrap();
        let (sed, noise) = write_scenario(dir.path());

        let mut config = PlotConfig::new(&sed, vec![noise], dir.path().join("plot.png"));
        config.stride = 1;
        let figure = build_figure(&config).unwrap();

        for panel in &figure.panels {
            let idx = &panel.series[0].indices;
            assert_eq!(idx.len(), 990);
            assert!(idx.iter().all(|i| !(500..510).contains(i)));
        }
    }

    #[test]
    fn end_to_end_svg_with_legend() {
        let dir = tempfile::tempdir().unwrap();
        let (sed, noise) = write_scenario(dir.path());
        let out = dir.path().join("plot.svg");

        let mut config = PlotConfig::new(&sed, vec![noise.clone(), noise], &out);
        config.style = small_style();
        config.labels = Some(vec!["first".to_string(), "second".to_string()]);
        render_noisemodel(&config).unwrap();

        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.contains("log F475W"));
        assert!(svg.contains("Completeness"));
        assert!(svg.contains("second"));
    }

    #[test]
    fn colors_cycle_across_catalogs() {
        let dir = tempfile::tempdir().unwrap();
        let (sed, noise) = write_scenario(dir.path());

        let files = vec![noise; 3];
        let mut config = PlotConfig::new(&sed, files, dir.path().join("plot.png"));
        config.colors = vec!["red".to_string(), "#0000ff".to_string()];
        let figure = build_figure(&config).unwrap();

        let colors: Vec<_> = figure.panel(Quantity::Error, 1).series.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![
                plotters::style::RGBColor(255, 0, 0),
                plotters::style::RGBColor(0, 0, 255),
                plotters::style::RGBColor(255, 0, 0),
            ]
        );
        assert!(figure.legend_panels().is_empty());
    }

    #[test]
    fn missing_sed_file_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let (_, noise) = write_scenario(dir.path());
        let out = dir.path().join("plot.png");

        let config = PlotConfig::new(dir.path().join("missing.csv"), vec![noise], &out);
        let err = render_noisemodel(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!out.exists());
    }

    #[test]
    fn label_mismatch_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.png");

        // Input files do not exist: the label check must fire first.
        let mut config = PlotConfig::new("nope.csv", vec![PathBuf::from("nope_noise.csv")], &out);
        config.labels = Some(vec!["a".to_string(), "b".to_string()]);
        let err = render_noisemodel(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("labels"), "{err}");
        assert!(!out.exists());
    }

    #[test]
    fn misaligned_catalog_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let (sed, _) = write_scenario(dir.path());
        let noise = dir.path().join("short.csv");
        std::fs::write(&noise, "error_0,bias_0,completeness_0\n1,0,1\n").unwrap();
        let out = dir.path().join("plot.png");

        let err = render_noisemodel(&PlotConfig::new(&sed, vec![noise], &out)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("short.csv"));
        assert!(!out.exists());
    }

    #[test]
    fn unsupported_output_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (sed, noise) = write_scenario(dir.path());
        let out = dir.path().join("plot.pdf");

        let err = render_noisemodel(&PlotConfig::new(&sed, vec![noise], &out)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!out.exists());
    }
}
