//! Render-independent figure model.
//!
//! The figure is a 3 x F grid of panels (rows: bias, error, completeness;
//! columns: filters). Catalogs are overplotted as one `Series` each. All
//! selection and legend decisions are made here so the renderer only draws.

use plotters::style::RGBColor;

use crate::domain::{NoiseModel, Quantity, SedGrid};
use crate::plot::select::{derive_points, select_indices};

/// Points from one catalog in one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub catalog: usize,
    pub color: RGBColor,
    pub alpha: f64,
    pub label: Option<String>,
    /// Object indices that passed selection, in plotting order.
    pub indices: Vec<usize>,
    /// `(log10 flux, y)` per selected object; may contain non-finite values.
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Points that can actually be placed on the axes.
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub filter: usize,
    pub quantity: Quantity,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub legend: Option<Vec<LegendEntry>>,
}

impl Panel {
    /// Data bounds `((x_min, x_max), (y_min, y_max))` over all finite points.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in self.series.iter().flat_map(Series::finite_points) {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
        if x.0.is_finite() && y.0.is_finite() { Some((x, y)) } else { None }
    }

    pub fn drawn_points(&self) -> usize {
        self.series.iter().map(|s| s.finite_points().count()).sum()
    }
}

/// Settings applied to one catalog as it is added.
#[derive(Debug, Clone)]
pub struct CatalogStyle<'a> {
    pub color: RGBColor,
    pub alpha: f64,
    pub label: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub filters: Vec<String>,
    /// Row-major: `panels[row * n_filters + filter]`.
    pub panels: Vec<Panel>,
    n_catalogs: usize,
}

impl Figure {
    pub fn new(filters: &[String]) -> Self {
        let mut panels = Vec::with_capacity(Quantity::ALL.len() * filters.len());
        for quantity in Quantity::ALL {
            for (filter, name) in filters.iter().enumerate() {
                panels.push(Panel {
                    filter,
                    quantity,
                    x_label: format!("log {name}"),
                    y_label: quantity.y_label().to_string(),
                    series: Vec::new(),
                    legend: None,
                });
            }
        }
        Self {
            filters: filters.to_vec(),
            panels,
            n_catalogs: 0,
        }
    }

    pub fn n_filters(&self) -> usize {
        self.filters.len()
    }

    pub fn n_catalogs(&self) -> usize {
        self.n_catalogs
    }

    pub fn panel(&self, quantity: Quantity, filter: usize) -> &Panel {
        &self.panels[quantity.row() * self.filters.len() + filter]
    }

    fn panel_mut(&mut self, quantity: Quantity, filter: usize) -> &mut Panel {
        let n = self.filters.len();
        &mut self.panels[quantity.row() * n + filter]
    }

    /// Overplot one catalog into every panel.
    ///
    /// `grid` and `model` must already be known to share a shape.
    pub fn add_catalog(&mut self, grid: &SedGrid, model: &NoiseModel, stride: usize, style: &CatalogStyle<'_>) {
        let catalog = self.n_catalogs;
        for filter in 0..self.filters.len() {
            let indices = select_indices(model, filter, stride);
            for quantity in Quantity::ALL {
                let points = derive_points(grid, model, filter, &indices, quantity);
                self.panel_mut(quantity, filter).series.push(Series {
                    catalog,
                    color: style.color,
                    alpha: style.alpha,
                    label: style.label.map(str::to_string),
                    indices: indices.clone(),
                    points,
                });
            }
        }
        self.n_catalogs += 1;
    }

    /// Attach legends once the last catalog has been added.
    ///
    /// Only the first filter's bias and error panels get one, and only when
    /// every series there carries a label. Entries copy the series style.
    pub fn attach_legends(&mut self) {
        if self.filters.is_empty() {
            return;
        }
        for quantity in Quantity::ALL.into_iter().filter(|q| q.takes_legend()) {
            let panel = self.panel_mut(quantity, 0);
            if panel.series.is_empty() || panel.series.iter().any(|s| s.label.is_none()) {
                continue;
            }
            let entries = panel
                .series
                .iter()
                .filter_map(|s| {
                    s.label.as_ref().map(|label| LegendEntry {
                        label: label.clone(),
                        color: s.color,
                        alpha: s.alpha,
                    })
                })
                .collect();
            panel.legend = Some(entries);
        }
    }

    /// Make every legend marker fully opaque, whatever the plotted alpha.
    pub fn finalize_legends(&mut self) {
        for entry in self.panels.iter_mut().filter_map(|p| p.legend.as_mut()).flatten() {
            entry.alpha = 1.0;
        }
    }

    /// Panels that carry a legend, as `(quantity, filter)`.
    pub fn legend_panels(&self) -> Vec<(Quantity, usize)> {
        self.panels
            .iter()
            .filter(|p| p.legend.is_some())
            .map(|p| (p.quantity, p.filter))
            .collect()
    }
}
