//! Shared domain types.
//!
//! - loaded inputs (`SedGrid`, `NoiseModel`)
//! - the three diagnostic quantities (`Quantity`)
//! - run configuration (`PlotConfig`, `FigureStyle`)

use std::path::PathBuf;

use nalgebra::DMatrix;

use crate::error::AppError;

/// Colors cycled across noise-model catalogs when none are given.
pub const DEFAULT_COLORS: [&str; 5] = ["black", "red", "gold", "lime", "xkcd:azure"];

/// Default subsample stride.
pub const DEFAULT_STRIDE: usize = 100;

/// Largest accepted font size, in points.
pub const MAX_FONT_SIZE: u32 = 200;

/// A grid of synthetic SEDs: `seds[(object, filter)]` holds a flux.
#[derive(Debug, Clone, PartialEq)]
pub struct SedGrid {
    pub seds: DMatrix<f64>,
    pub filters: Vec<String>,
}

impl SedGrid {
    pub fn new(seds: DMatrix<f64>, filters: Vec<String>) -> Result<Self, AppError> {
        if filters.is_empty() {
            return Err(AppError::data("SED grid has no filters."));
        }
        if seds.ncols() != filters.len() {
            return Err(AppError::data(format!(
                "SED grid has {} flux columns but {} filter names.",
                seds.ncols(),
                filters.len()
            )));
        }
        Ok(Self { seds, filters })
    }

    pub fn n_objects(&self) -> usize {
        self.seds.nrows()
    }

    pub fn n_filters(&self) -> usize {
        self.filters.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.seds.shape()
    }
}

/// Per-object, per-filter noise estimates aligned to an SED grid.
///
/// A non-positive `error` marks an extrapolated (unusable) measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseModel {
    pub error: DMatrix<f64>,
    pub bias: DMatrix<f64>,
    pub completeness: DMatrix<f64>,
}

impl NoiseModel {
    pub fn new(error: DMatrix<f64>, bias: DMatrix<f64>, completeness: DMatrix<f64>) -> Result<Self, AppError> {
        let shape = error.shape();
        if bias.shape() != shape || completeness.shape() != shape {
            return Err(AppError::data(format!(
                "Noise model arrays disagree in shape: error {:?}, bias {:?}, completeness {:?}.",
                shape,
                bias.shape(),
                completeness.shape()
            )));
        }
        Ok(Self {
            error,
            bias,
            completeness,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.error.shape()
    }

    /// Fail unless this catalog indexes the same `[object, filter]` cells as `grid`.
    pub fn ensure_aligned(&self, grid: &SedGrid) -> Result<(), AppError> {
        if self.shape() != grid.shape() {
            return Err(AppError::data(format!(
                "Noise model shape {:?} (objects, filters) does not match SED grid shape {:?}.",
                self.shape(),
                grid.shape()
            )));
        }
        Ok(())
    }
}

/// One row of the diagnostic figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Bias,
    Error,
    Completeness,
}

impl Quantity {
    /// Row order, top to bottom.
    pub const ALL: [Quantity; 3] = [Quantity::Bias, Quantity::Error, Quantity::Completeness];

    pub fn row(self) -> usize {
        match self {
            Quantity::Bias => 0,
            Quantity::Error => 1,
            Quantity::Completeness => 2,
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Quantity::Bias => "Bias (μ/F)",
            Quantity::Error => "Error (σ/F)",
            Quantity::Completeness => "Completeness",
        }
    }

    /// Whether this row may carry a legend.
    pub fn takes_legend(self) -> bool {
        !matches!(self, Quantity::Completeness)
    }
}

/// Figure-scoped styling. Nothing here touches renderer-wide defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    /// Image size in pixels.
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    /// Marker radius in pixels.
    pub marker_size: u32,
    /// Opacity of plotted markers; legend markers are always opaque.
    pub marker_alpha: f64,
    pub line_width: u32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width: 2500,
            height: 1500,
            font_size: 12,
            marker_size: 2,
            marker_alpha: 0.1,
            line_width: 2,
        }
    }
}

/// Resolved configuration for a single plotting run.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub sed_file: PathBuf,
    pub noise_files: Vec<PathBuf>,
    pub plot_file: PathBuf,
    pub stride: usize,
    pub colors: Vec<String>,
    pub labels: Option<Vec<String>>,
    pub style: FigureStyle,
}

impl PlotConfig {
    pub fn new(sed_file: impl Into<PathBuf>, noise_files: Vec<PathBuf>, plot_file: impl Into<PathBuf>) -> Self {
        Self {
            sed_file: sed_file.into(),
            noise_files,
            plot_file: plot_file.into(),
            stride: DEFAULT_STRIDE,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            labels: None,
            style: FigureStyle::default(),
        }
    }

    /// Check the configuration contract before any file is touched.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.noise_files.is_empty() {
            return Err(AppError::input("At least one noise model file is required."));
        }
        if self.stride == 0 {
            return Err(AppError::input("Subsample stride (`--samp`) must be >= 1."));
        }
        if self.colors.is_empty() {
            return Err(AppError::input("At least one color is required."));
        }
        if let Some(labels) = &self.labels {
            if labels.len() != self.noise_files.len() {
                return Err(AppError::input(format!(
                    "Got {} labels for {} noise model files; pass exactly one label per file.",
                    labels.len(),
                    self.noise_files.len()
                )));
            }
        }
        if self.style.width == 0 || self.style.height == 0 {
            return Err(AppError::input("Figure width and height must be > 0."));
        }
        if !(1..=MAX_FONT_SIZE).contains(&self.style.font_size) {
            return Err(AppError::input(format!(
                "Font size must be within 1..={MAX_FONT_SIZE}, got {}.",
                self.style.font_size
            )));
        }
        if !(self.style.marker_alpha.is_finite() && (0.0..=1.0).contains(&self.style.marker_alpha)) {
            return Err(AppError::input("Marker alpha must be within [0, 1]."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n_files: usize) -> PlotConfig {
        let files = (0..n_files).map(|i| PathBuf::from(format!("noise_{i}.csv"))).collect();
        PlotConfig::new("seds.csv", files, "out.png")
    }

    #[test]
    fn defaults_follow_cli_defaults() {
        let cfg = config(1);
        assert_eq!(cfg.stride, 100);
        assert_eq!(cfg.colors, vec!["black", "red", "gold", "lime", "xkcd:azure"]);
        assert!(cfg.labels.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn label_count_must_match_catalogs() {
        let mut cfg = config(2);
        cfg.labels = Some(vec!["only one".to_string()]);
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("1 labels for 2"), "{err}");

        cfg.labels = Some(vec!["a".to_string(), "b".to_string()]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert_eq!(config(0).validate().unwrap_err().exit_code(), 2);

        let mut cfg = config(1);
        cfg.stride = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = config(1);
        cfg.colors.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn font_size_is_bounded() {
        let mut cfg = config(1);
        cfg.style.font_size = 1_000_000_000;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Font size"), "{err}");

        cfg.style.font_size = 0;
        assert!(cfg.validate().is_err());

        cfg.style.font_size = MAX_FONT_SIZE;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn noise_model_alignment_is_checked() {
        let grid = SedGrid::new(DMatrix::from_element(4, 2, 1.0), vec!["A".into(), "B".into()]).unwrap();
        let ok = NoiseModel::new(
            DMatrix::from_element(4, 2, 1.0),
            DMatrix::zeros(4, 2),
            DMatrix::from_element(4, 2, 0.5),
        )
        .unwrap();
        assert!(ok.ensure_aligned(&grid).is_ok());

        let short = NoiseModel::new(
            DMatrix::from_element(3, 2, 1.0),
            DMatrix::zeros(3, 2),
            DMatrix::from_element(3, 2, 0.5),
        )
        .unwrap();
        assert_eq!(short.ensure_aligned(&grid).unwrap_err().exit_code(), 3);

        assert!(NoiseModel::new(DMatrix::zeros(3, 2), DMatrix::zeros(3, 1), DMatrix::zeros(3, 2)).is_err());
    }

    #[test]
    fn grid_requires_matching_filter_names() {
        assert!(SedGrid::new(DMatrix::zeros(2, 2), vec!["A".into()]).is_err());
        assert!(SedGrid::new(DMatrix::zeros(2, 0), Vec::new()).is_err());
    }

    #[test]
    fn only_bias_and_error_rows_take_legends() {
        let rows: Vec<bool> = Quantity::ALL.iter().map(|q| q.takes_legend()).collect();
        assert_eq!(rows, vec![true, true, false]);
        assert_eq!(Quantity::Completeness.row(), 2);
    }
}
