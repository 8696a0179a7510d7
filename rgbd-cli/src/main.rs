mod app;
mod cli;
mod synthetic;

use std::fs;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rgbd_core::pipeline;
use rgbd_io::FileSink;

use app::{AppSink, AppState};
use synthetic::SyntheticSource;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();

    let calibration = match &args.calibration {
        Some(path) => rgbd_io::load_calibration(path)?,
        None => synthetic::default_calibration(args.depth_mode),
    };
    info!(
        depth = ?calibration.depth_resolution(),
        color = ?calibration.color_resolution(),
        "calibration loaded"
    );

    let file_sink = if args.no_write {
        None
    } else {
        fs::create_dir_all(&args.output)?;
        Some(FileSink::new(args.output.clone(), None))
    };

    let mut source = SyntheticSource::new(calibration);
    let mut sink = AppSink::new(AppState::new(args.frames, !args.no_write), file_sink);

    pipeline::run(
        &mut source,
        &mut sink,
        args.reference.into(),
        Duration::from_millis(args.timeout_ms),
    )?;

    info!("capture loop finished");
    Ok(())
}
