use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use rgbd_core::ReferenceCamera;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Calibration record (JSON). A built-in synthetic calibration is used
    /// when omitted
    #[arg(long)]
    pub calibration: Option<PathBuf>,

    /// Directory for per-frame output files
    #[arg(long, default_value = "captures")]
    pub output: PathBuf,

    /// Stop after this many processed frames
    #[arg(long, default_value_t = 30)]
    pub frames: usize,

    /// Camera frame the point cloud is expressed in
    #[arg(long, value_enum, default_value_t = Reference::Depth)]
    pub reference: Reference,

    /// Capture timeout in milliseconds
    #[arg(long, default_value_t = 250)]
    pub timeout_ms: u64,

    /// Process and log without writing files
    #[arg(long)]
    pub no_write: bool,

    /// Depth capture mode for the synthetic source
    #[arg(long, value_enum, default_value_t = DepthMode::NfovUnbinned)]
    pub depth_mode: DepthMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Reference {
    Depth,
    Color,
}

impl From<Reference> for ReferenceCamera {
    fn from(value: Reference) -> Self {
        match value {
            Reference::Depth => ReferenceCamera::Depth,
            Reference::Color => ReferenceCamera::Color,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DepthMode {
    /// 640x576 narrow field of view
    NfovUnbinned,
    /// 512x512 wide field of view, 2x2 binned
    WfovBinned,
}

impl DepthMode {
    pub fn resolution(&self) -> (usize, usize) {
        match self {
            DepthMode::NfovUnbinned => (640, 576),
            DepthMode::WfovBinned => (512, 512),
        }
    }
}
