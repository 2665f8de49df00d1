//! Plotters renderer for the figure model.
//!
//! The output extension picks the backend: `.svg` uses the SVG backend (labels
//! emitted as text elements); `.png`, `.jpg` and `.bmp` use the bitmap backend.
//! Bitmap text is rasterised from the embedded DejaVu Sans font.

use std::path::Path;
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::domain::FigureStyle;
use crate::error::AppError;
use crate::plot::figure::{Figure, Panel};

/// Image encoding of the saved figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG, JPEG or BMP, encoded from the extension.
    Bitmap,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Ok(ImageFormat::Bitmap),
            other => Err(AppError::input(format!(
                "Unsupported plot extension '.{other}' for '{}' (expected .png, .jpg, .bmp or .svg).",
                path.display()
            ))),
        }
    }
}

/// Family every figure text style is drawn with.
const FONT_FAMILY: &str = "sans-serif";

static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Register the embedded font with plotters, once per process.
fn ensure_font() -> Result<(), AppError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED.get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err(AppError::render("Embedded font could not be loaded."))
    }
}

/// Draw `figure` and write it to `path`, replacing any existing file.
pub fn save_figure(figure: &Figure, style: &FigureStyle, path: &Path) -> Result<(), AppError> {
    let size = (style.width, style.height);
    let format = ImageFormat::from_path(path)?;
    ensure_font()?;

    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(&root, figure, style)?;
            root.present().map_err(|e| save_err(path, e))
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_figure(&root, figure, style)?;
            root.present().map_err(|e| save_err(path, e))
        }
    }
}

fn save_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::render(format!("Failed to save plot '{}': {e}", path.display()))
}

fn draw_err(e: impl std::fmt::Display) -> AppError {
    AppError::render(format!("Failed to draw plot: {e}"))
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    style: &FigureStyle,
) -> Result<(), AppError> {
    root.fill(&WHITE).map_err(draw_err)?;

    let n_cols = figure.n_filters().max(1);
    // split_evenly is row-major, matching the figure's panel order.
    let areas = root.split_evenly((3, n_cols));
    for (area, panel) in areas.iter().zip(figure.panels.iter()) {
        draw_panel(area, panel, style)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &FigureStyle,
) -> Result<(), AppError> {
    let ((x0, x1), (y0, y1)) = panel_ranges(panel);
    let font = (FONT_FAMILY, style.font_size as f64).into_font().color(&BLACK);
    let label_area = style.font_size.saturating_mul(5);

    let mut chart = ChartBuilder::on(area)
        .margin(style.font_size)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area.saturating_add(style.font_size))
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .x_labels(6)
        .y_labels(6)
        .label_style(font.clone())
        .axis_desc_style(font.clone())
        .axis_style(BLACK.stroke_width(style.line_width))
        .draw()
        .map_err(draw_err)?;

    let radius = style.marker_size as i32;
    for series in &panel.series {
        let marker = series.color.mix(series.alpha).filled();
        chart
            .draw_series(series.finite_points().map(|p| Circle::new(p, radius, marker)))
            .map_err(draw_err)?;
    }

    if let Some(entries) = &panel.legend {
        // Empty series carry one legend entry each; their markers use the
        // legend's own (opaque) alpha rather than the plotted one.
        for entry in entries {
            let marker = entry.color.mix(entry.alpha).filled();
            let legend_radius = radius.max(4);
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
                .map_err(draw_err)?
                .label(entry.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), legend_radius, marker));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(font.clone())
            .draw()
            .map_err(draw_err)?;
    }

    Ok(())
}

/// Axis ranges for a panel: data bounds padded by 5%, with fallbacks for
/// empty or single-valued data.
pub fn panel_ranges(panel: &Panel) -> ((f64, f64), (f64, f64)) {
    match panel.bounds() {
        Some((x, y)) => (pad_range(x.0, x.1), pad_range(y.0, y.1)),
        None => ((0.0, 1.0), (0.0, 1.0)),
    }
}

fn pad_range(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < 1e-12 {
        let half = (lo.abs() * 0.05).max(0.5);
        return (lo - half, hi + half);
    }
    (lo - span * 0.05, hi + span * 0.05)
}
