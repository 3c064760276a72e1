//! The `urlqr` command line tool. Resolves flags and environment defaults, validates the
//! URL, encodes it and saves the QR code as a PNG. Every run is logged to stderr and to a
//! rotating `app.log`.

mod args;
pub mod config;
pub mod error;
pub mod filename;
pub mod input;
pub mod logging;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::{error::ErrorKind, Parser};
use image::{ImageError, ImageFormat};
use tracing::{error, info};

pub use args::Cli;
use config::{Environment, RunConfig};
use error::{AppError, AppResult};
use filename::resolve_filename;
use input::validate_url;

use crate::builder::QRBuilder;

pub static DOTENV_FILE: &str = ".env";

/// Entry point of the binary. Loads `.env` from the working directory, sets up logging
/// and runs a single generation.
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let env = match Environment::load(Path::new(DOTENV_FILE)) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let log_dir = env.log_dir();
    let _guard = match logging::init(&log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging in {}: {e}", log_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            if let Err(e) = e.print() {
                error!("Failed to print help: {e}");
                return ExitCode::FAILURE;
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(AppError::Config(e.to_string().trim_end().to_string())),
    };

    match generate(&cli, &env) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(err: AppError) -> ExitCode {
    error!("{err}");
    ExitCode::from(err.exit_code())
}

/// Runs the pipeline for parsed flags and returns the absolute path of the saved image.
pub fn generate(cli: &Cli, env: &Environment) -> AppResult<PathBuf> {
    let config = RunConfig::resolve(cli, env)?;
    let url = validate_url(&config.url)?;

    let filename = resolve_filename(config.filename.as_deref(), None, Local::now().naive_local());
    let out_path = config.output_dir.join(filename);

    info!("Generating QR for: {url}");
    info!("Writing to: {}", out_path.display());

    let saved = write_qr(url, &out_path, &config)?;

    let msg = format!("QR code saved: {}", saved.display());
    info!("{msg}");
    if !config.silent {
        println!("{msg}");
    }
    Ok(saved)
}

/// Encodes `data`, renders it with the configured box size and border and saves it to
/// `out_path`, overwriting any existing file.
pub fn write_qr(data: &str, out_path: &Path, config: &RunConfig) -> AppResult<PathBuf> {
    fs::create_dir_all(&config.output_dir).map_err(|e| AppError::io(&config.output_dir, e))?;

    let qr = QRBuilder::new(data.as_bytes())
        .ec_level(config.ec_level)
        .build()
        .map_err(AppError::Encoding)?;
    let img = qr.render(config.box_size, config.border).map_err(AppError::Raster)?;

    img.save_with_format(out_path, ImageFormat::Png).map_err(|e| match e {
        ImageError::IoError(e) => AppError::io(out_path, e),
        e => AppError::io(out_path, io::Error::other(e)),
    })?;

    out_path.canonicalize().map_err(|e| AppError::io(out_path, e))
}
