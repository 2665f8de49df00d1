//! Synthetic SED grid and noise-model generation.
//!
//! Produces a seeded, reproducible grid plus one or more catalogs that look
//! like the output of artificial-star tests:
//! - fluxes are log-uniform per filter (redder filters sit slightly fainter)
//! - error grows as `sqrt(flux)` with log-normal scatter
//! - bias is a small signed fraction of the error
//! - completeness is a logistic step in log flux
//! - outside the sampled flux range the error is negated (extrapolated)

use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{NoiseModel, SedGrid};
use crate::error::AppError;

/// Offset in log flux between neighbouring filters.
const FILTER_LOG_OFFSET: f64 = 0.2;

/// How much deeper (in log flux) each successive catalog reaches.
const CATALOG_DEPTH_STEP: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub n_objects: usize,
    pub filters: Vec<String>,
    pub n_catalogs: usize,
    pub seed: u64,
    /// Log10 flux range of the grid in the first filter.
    pub log_flux_min: f64,
    pub log_flux_max: f64,
    /// Log10 flux range covered by the artificial-star tests.
    pub sampled_min: f64,
    pub sampled_max: f64,
    /// Log10 flux at which completeness reaches 50% (first catalog).
    pub log_flux_50: f64,
    /// Log-normal scatter of the error.
    pub error_scatter: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_objects: 10_000,
            filters: ["F275W", "F336W", "F475W", "F814W", "F110W", "F160W"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            n_catalogs: 1,
            seed: 42,
            log_flux_min: -21.0,
            log_flux_max: -15.0,
            sampled_min: -20.0,
            sampled_max: -15.5,
            log_flux_50: -19.0,
            error_scatter: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticSample {
    pub grid: SedGrid,
    pub catalogs: Vec<NoiseModel>,
}

pub fn generate(config: &SyntheticConfig) -> Result<SyntheticSample, AppError> {
    if config.filters.is_empty() {
        return Err(AppError::input("At least one filter is required."));
    }
    if config.n_catalogs == 0 {
        return Err(AppError::input("At least one noise model is required."));
    }
    if !(config.log_flux_min.is_finite() && config.log_flux_max.is_finite() && config.log_flux_max > config.log_flux_min)
    {
        return Err(AppError::input("Invalid log flux range for sample generation."));
    }
    if !(config.sampled_max > config.sampled_min) {
        return Err(AppError::input("Invalid sampled flux range for sample generation."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let scatter = Normal::new(0.0, config.error_scatter)
        .map_err(|e| AppError::input(format!("Invalid error scatter: {e}")))?;
    let unit = Normal::new(0.0, 1.0).map_err(|e| AppError::input(format!("Invalid noise distribution: {e}")))?;

    let n = config.n_objects;
    let n_filters = config.filters.len();

    let mut seds = DMatrix::<f64>::zeros(n, n_filters);
    for f in 0..n_filters {
        let shift = FILTER_LOG_OFFSET * f as f64;
        for i in 0..n {
            let log_flux = rng.gen_range(config.log_flux_min..config.log_flux_max) - shift;
            seds[(i, f)] = 10f64.powf(log_flux);
        }
    }
    let grid = SedGrid::new(seds, config.filters.clone())?;

    let mut catalogs = Vec::with_capacity(config.n_catalogs);
    for k in 0..config.n_catalogs {
        let depth = CATALOG_DEPTH_STEP * k as f64;
        let mut error = DMatrix::<f64>::zeros(n, n_filters);
        let mut bias = DMatrix::<f64>::zeros(n, n_filters);
        let mut completeness = DMatrix::<f64>::zeros(n, n_filters);

        for f in 0..n_filters {
            let shift = FILTER_LOG_OFFSET * f as f64;
            let (lo, hi) = (config.sampled_min - shift - depth, config.sampled_max - shift);
            let log_f50 = config.log_flux_50 - shift - depth;
            // Error at the 50% completeness flux, where S/N is roughly 5.
            let sigma_50 = 0.2 * 10f64.powf(log_f50);

            for i in 0..n {
                let flux = grid.seds[(i, f)];
                let log_flux = flux.log10();

                let sigma = sigma_50 * (flux / 10f64.powf(log_f50)).sqrt() * scatter.sample(&mut rng).exp();
                let extrapolated = log_flux < lo || log_flux > hi;
                error[(i, f)] = if extrapolated { -sigma } else { sigma };
                bias[(i, f)] = 0.1 * sigma * unit.sample(&mut rng);
                completeness[(i, f)] = logistic((log_flux - log_f50) / 0.15);
            }
        }

        catalogs.push(NoiseModel::new(error, bias, completeness)?);
    }

    Ok(SyntheticSample { grid, catalogs })
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
