//! Write a synthetic SED grid and matching noise-model CSVs.
//!
//! ```text
//! generate_sample --out-dir sample --catalogs 2
//! nmplot sample/seds.csv sample/noise_0.csv sample/noise_1.csv plot.png --label shallow deep
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use nmplot::data::synthetic::{SyntheticConfig, generate};
use nmplot::error::AppError;
use nmplot::io::{write_noise_model_csv, write_sed_grid_csv};

#[derive(Debug, Parser)]
#[command(name = "generate_sample", about = "Write a synthetic SED grid and noise models")]
struct Args {
    /// Directory to write `seds.csv` and `noise_<k>.csv` into.
    #[arg(long, default_value = "sample")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = SyntheticConfig::default().n_objects)]
    objects: usize,

    /// Filter names, one column each.
    #[arg(long, num_args = 1.., default_values_t = SyntheticConfig::default().filters)]
    filters: Vec<String>,

    /// Number of noise-model files; each one reaches slightly deeper.
    #[arg(long, default_value_t = 1)]
    catalogs: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();
    let config = SyntheticConfig {
        n_objects: args.objects,
        filters: args.filters,
        n_catalogs: args.catalogs,
        seed: args.seed,
        ..SyntheticConfig::default()
    };
    let sample = generate(&config)?;

    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::input(format!("Failed to create directory '{}': {e}", args.out_dir.display()))
    })?;

    let sed_path = args.out_dir.join("seds.csv");
    write_sed_grid_csv(&sed_path, &sample.grid)?;
    info!(
        "wrote {} ({} objects x {} filters)",
        sed_path.display(),
        sample.grid.n_objects(),
        sample.grid.n_filters()
    );

    for (k, catalog) in sample.catalogs.iter().enumerate() {
        let path = args.out_dir.join(format!("noise_{k}.csv"));
        write_noise_model_csv(&path, catalog)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
