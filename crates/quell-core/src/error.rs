use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Cannot open source video {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Cannot open destination video {path}: {reason}")]
    DestinationUnavailable { path: PathBuf, reason: String },

    #[error("Frame {frame} is {found_width}x{found_height}, expected {width}x{height}")]
    ShapeMismatch {
        frame: usize,
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },

    #[error("Temporal filter requires at least {required} frames, got {actual}")]
    TooFewFrames { required: usize, actual: usize },

    #[error("{failed} worker unit(s) faulted; first at unit {unit}: {reason}")]
    WorkerFault {
        failed: usize,
        unit: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, QuellError>;
