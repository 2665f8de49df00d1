//! Point selection: validity filter, stride subsample and derived coordinates.

use crate::domain::{NoiseModel, Quantity, SedGrid};

/// Indices of objects whose error in `filter` is strictly positive.
///
/// Non-positive errors mark extrapolated estimates and are never plotted.
pub fn valid_indices(model: &NoiseModel, filter: usize) -> Vec<usize> {
    model
        .error
        .column(filter)
        .iter()
        .enumerate()
        .filter(|(_, err)| **err > 0.0)
        .map(|(i, _)| i)
        .collect()
}

/// Every `stride`-th element, starting with the first. `stride` must be >= 1.
pub fn subsample(indices: &[usize], stride: usize) -> Vec<usize> {
    indices.iter().step_by(stride.max(1)).copied().collect()
}

/// Objects plotted for one `(catalog, filter)` pair.
pub fn select_indices(model: &NoiseModel, filter: usize, stride: usize) -> Vec<usize> {
    subsample(&valid_indices(model, filter), stride)
}

/// `(log10 flux, y)` for each selected object.
///
/// Bias and error are scaled by flux; completeness is plotted as is. Points
/// with a non-finite coordinate are kept here and skipped when drawing.
pub fn derive_points(
    grid: &SedGrid,
    model: &NoiseModel,
    filter: usize,
    indices: &[usize],
    quantity: Quantity,
) -> Vec<(f64, f64)> {
    indices
        .iter()
        .map(|&i| {
            let flux = grid.seds[(i, filter)];
            let y = match quantity {
                Quantity::Bias => model.bias[(i, filter)] / flux,
                Quantity::Error => model.error[(i, filter)] / flux,
                Quantity::Completeness => model.completeness[(i, filter)],
            };
            (flux.log10(), y)
        })
        .collect()
}
